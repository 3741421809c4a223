//! Store manager that dispatches to the configured provider.

use std::sync::Arc;

use tracing::info;

use brasa_core::config::DatabaseConfig;
use brasa_core::error::AppError;
use brasa_core::result::AppResult;
use brasa_entity::subscription::store::SubscriptionStore;

use crate::connection::DatabasePool;
use crate::memory::MemorySubscriptionStore;
use crate::repositories::subscription::SubscriptionRepository;

/// Subscription store manager wrapping the configured backend.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store.
    inner: Arc<dyn SubscriptionStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        let inner: Arc<dyn SubscriptionStore> = match config.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL subscription store");
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    crate::migration::run_migrations(pool.pool()).await?;
                }
                Arc::new(SubscriptionRepository::new(pool.into_pool()))
            }
            "memory" => {
                info!("Initializing in-memory subscription store");
                Arc::new(MemorySubscriptionStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, postgres"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { inner: store }
    }

    /// The inner store as a shared trait object.
    pub fn store(&self) -> Arc<dyn SubscriptionStore> {
        Arc::clone(&self.inner)
    }
}
