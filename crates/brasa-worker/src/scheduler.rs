//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use brasa_core::config::worker::WorkerConfig;
use brasa_core::error::AppError;
use brasa_entity::subscription::store::SubscriptionStore;

use crate::jobs::cleanup::SubscriptionCleanupJob;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Worker configuration
    config: WorkerConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(config: WorkerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler, config })
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(
        &self,
        store: Arc<dyn SubscriptionStore>,
    ) -> Result<(), AppError> {
        self.register_subscription_cleanup(store).await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Stale subscription cleanup — schedule from configuration
    async fn register_subscription_cleanup(
        &self,
        store: Arc<dyn SubscriptionStore>,
    ) -> Result<(), AppError> {
        let stale_after_days = self.config.stale_after_days;
        let job = CronJob::new_async(self.config.cleanup_schedule.as_str(), move |_uuid, _lock| {
            let store = Arc::clone(&store);
            Box::pin(async move {
                tracing::debug!("Running subscription_cleanup job");
                let job = SubscriptionCleanupJob::new(store, stale_after_days);
                if let Err(e) = job.run().await {
                    tracing::error!("subscription_cleanup failed: {}", e);
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!(
                "Failed to create subscription_cleanup schedule: {}",
                e
            ))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add subscription_cleanup schedule: {}", e))
        })?;

        tracing::info!(
            schedule = %self.config.cleanup_schedule,
            "Registered: subscription_cleanup"
        );
        Ok(())
    }
}
