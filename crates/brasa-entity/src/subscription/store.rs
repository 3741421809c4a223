//! Subscription store trait implemented by every backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use brasa_core::result::AppResult;

use super::model::DeviceSubscription;

/// Outcome of saving a token.
///
/// A duplicate registration is a success from the caller's perspective,
/// not an error; the two variants only differ in the HTTP status the API
/// reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new row was created.
    Created,
    /// The token was already registered; the row was touched, not duplicated.
    AlreadyRegistered,
}

/// Storage backend for device subscriptions.
///
/// Implementations: PostgreSQL for production, in-memory for development
/// and tests. Selected by `DatabaseConfig::provider`.
#[async_trait]
pub trait SubscriptionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a token. Duplicate tokens refresh `last_active_at` and
    /// report [`SaveOutcome::AlreadyRegistered`].
    async fn save(&self, subscription: &DeviceSubscription) -> AppResult<SaveOutcome>;

    /// All currently registered subscriptions, newest first.
    async fn list_active(&self) -> AppResult<Vec<DeviceSubscription>>;

    /// Find a subscription by its token.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<DeviceSubscription>>;

    /// Remove subscriptions whose `last_active_at` is older than the cutoff.
    /// Returns the number of rows removed.
    async fn delete_stale(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;

    /// Total number of registered subscriptions.
    async fn count(&self) -> AppResult<u64>;

    /// Whether the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
