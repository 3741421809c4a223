//! # brasa-core
//!
//! Core crate for the Brasa PWA platform. Contains configuration schemas,
//! domain events and the event bus, shared traits, common types, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Brasa crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
