//! Service-worker lifecycle and request interception.

pub mod controller;
pub mod fetch;
pub mod message;
pub mod scripts;
