//! Repository implementations backed by PostgreSQL.

pub mod subscription;

pub use subscription::SubscriptionRepository;
