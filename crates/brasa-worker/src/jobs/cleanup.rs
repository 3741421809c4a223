//! Stale subscription cleanup job.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use brasa_core::result::AppResult;
use brasa_entity::subscription::store::SubscriptionStore;

/// Removes subscriptions whose devices stopped re-registering.
///
/// Tokens go dead silently (app uninstalled, permission revoked, token
/// rotated); rows idle past the horizon are dropped so the dispatch sweep
/// stops paying for them.
#[derive(Debug)]
pub struct SubscriptionCleanupJob {
    store: Arc<dyn SubscriptionStore>,
    stale_after_days: i64,
}

impl SubscriptionCleanupJob {
    /// Create a cleanup job.
    pub fn new(store: Arc<dyn SubscriptionStore>, stale_after_days: i64) -> Self {
        Self {
            store,
            stale_after_days,
        }
    }

    /// Run one cleanup pass. Returns the number of rows removed.
    pub async fn run(&self) -> AppResult<u64> {
        info!(
            stale_after_days = self.stale_after_days,
            "Running subscription cleanup"
        );

        let cutoff = Utc::now() - Duration::days(self.stale_after_days);
        let removed = self.store.delete_stale(cutoff).await?;

        info!(removed, "Subscription cleanup finished");
        Ok(removed)
    }
}
