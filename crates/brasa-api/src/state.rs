//! Application state shared across all handlers.

use std::sync::Arc;

use brasa_core::config::AppConfig;
use brasa_entity::subscription::store::SubscriptionStore;
use brasa_worker::jobs::dispatch::NotificationDispatchJob;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Subscription store (PostgreSQL or in-memory).
    pub store: Arc<dyn SubscriptionStore>,
    /// Notification dispatcher; `None` while messaging is unconfigured,
    /// which disables the dispatch endpoint only.
    pub dispatcher: Option<Arc<NotificationDispatchJob>>,
}

impl AppState {
    /// Assemble the state.
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn SubscriptionStore>,
        dispatcher: Option<Arc<NotificationDispatchJob>>,
    ) -> Self {
        Self {
            config,
            store,
            dispatcher,
        }
    }
}
