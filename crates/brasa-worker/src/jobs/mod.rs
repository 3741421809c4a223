//! Background job implementations.

pub mod cleanup;
pub mod dispatch;

pub use cleanup::SubscriptionCleanupJob;
pub use dispatch::NotificationDispatchJob;
