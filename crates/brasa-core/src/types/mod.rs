//! Common types shared across Brasa crates.

pub mod permission;
pub mod platform;
pub mod response;

pub use permission::PermissionState;
pub use platform::Platform;
