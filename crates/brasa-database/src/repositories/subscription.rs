//! Subscription repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use brasa_core::error::{AppError, ErrorKind};
use brasa_core::result::AppResult;
use brasa_entity::subscription::model::DeviceSubscription;
use brasa_entity::subscription::store::{SaveOutcome, SubscriptionStore};

/// PostgreSQL-backed subscription store.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for SubscriptionRepository {
    async fn save(&self, subscription: &DeviceSubscription) -> AppResult<SaveOutcome> {
        // The unique token index makes re-registration an update of the
        // activity timestamp rather than a second row.
        let result = sqlx::query(
            "INSERT INTO device_subscriptions (id, token, platform, user_agent, created_at, last_active_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (token) DO NOTHING",
        )
        .bind(subscription.id)
        .bind(&subscription.token)
        .bind(&subscription.platform)
        .bind(&subscription.user_agent)
        .bind(subscription.created_at)
        .bind(subscription.last_active_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to save subscription", e)
        })?;

        if result.rows_affected() > 0 {
            return Ok(SaveOutcome::Created);
        }

        sqlx::query("UPDATE device_subscriptions SET last_active_at = NOW() WHERE token = $1")
            .bind(&subscription.token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to touch subscription", e)
            })?;

        Ok(SaveOutcome::AlreadyRegistered)
    }

    async fn list_active(&self) -> AppResult<Vec<DeviceSubscription>> {
        sqlx::query_as::<_, DeviceSubscription>(
            "SELECT * FROM device_subscriptions ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list subscriptions", e)
        })
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<DeviceSubscription>> {
        sqlx::query_as::<_, DeviceSubscription>(
            "SELECT * FROM device_subscriptions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find subscription", e)
        })
    }

    async fn delete_stale(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM device_subscriptions WHERE last_active_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete stale subscriptions", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM device_subscriptions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count subscriptions", e)
            })?;
        Ok(count as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
