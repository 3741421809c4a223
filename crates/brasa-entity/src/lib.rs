//! # brasa-entity
//!
//! Domain models for the Brasa PWA platform: the persisted device
//! subscription row and the store trait every backend implements.

pub mod subscription;

pub use subscription::model::DeviceSubscription;
pub use subscription::store::{SaveOutcome, SubscriptionStore};
