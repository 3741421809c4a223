//! In-memory subscription store for development and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use brasa_core::result::AppResult;
use brasa_entity::subscription::model::DeviceSubscription;
use brasa_entity::subscription::store::{SaveOutcome, SubscriptionStore};

/// Subscription store keyed by token in process memory.
///
/// Mirrors the uniqueness semantics of the PostgreSQL repository: a
/// duplicate token touches `last_active_at` instead of inserting.
#[derive(Debug, Default)]
pub struct MemorySubscriptionStore {
    rows: DashMap<String, DeviceSubscription>,
}

impl MemorySubscriptionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for MemorySubscriptionStore {
    async fn save(&self, subscription: &DeviceSubscription) -> AppResult<SaveOutcome> {
        if let Some(mut existing) = self.rows.get_mut(&subscription.token) {
            existing.last_active_at = Utc::now();
            return Ok(SaveOutcome::AlreadyRegistered);
        }

        self.rows
            .insert(subscription.token.clone(), subscription.clone());
        Ok(SaveOutcome::Created)
    }

    async fn list_active(&self) -> AppResult<Vec<DeviceSubscription>> {
        let mut rows: Vec<DeviceSubscription> =
            self.rows.iter().map(|r| r.value().clone()).collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<DeviceSubscription>> {
        Ok(self.rows.get(token).map(|r| r.value().clone()))
    }

    async fn delete_stale(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let before = self.rows.len();
        self.rows.retain(|_, row| row.last_active_at >= cutoff);
        Ok((before - self.rows.len()) as u64)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.len() as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_token_is_not_a_second_row() {
        let store = MemorySubscriptionStore::new();
        let sub = DeviceSubscription::new("tok-1".into(), None, None);

        assert_eq!(store.save(&sub).await.unwrap(), SaveOutcome::Created);
        assert_eq!(
            store.save(&sub).await.unwrap(),
            SaveOutcome::AlreadyRegistered
        );
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn stale_rows_are_swept() {
        let store = MemorySubscriptionStore::new();
        let mut old = DeviceSubscription::new("tok-old".into(), None, None);
        old.last_active_at = Utc::now() - chrono::Duration::days(120);
        store.save(&old).await.unwrap();
        store
            .save(&DeviceSubscription::new("tok-new".into(), None, None))
            .await
            .unwrap();

        let cutoff = Utc::now() - chrono::Duration::days(90);
        assert_eq!(store.delete_stale(cutoff).await.unwrap(), 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
