//! # brasa-push
//!
//! The push-notification side of the platform: the permission → token →
//! registration pipeline with bounded retries and scheduled refresh, the
//! per-platform notification payload builder, the subscription store HTTP
//! client, and the gateway traits the production bindings implement.

pub mod gateway;
pub mod payload;
pub mod store;
pub mod token;

pub use payload::builder::{NotificationContent, PayloadBuilder};
pub use store::SubscriptionStoreClient;
pub use token::manager::PushTokenManager;
