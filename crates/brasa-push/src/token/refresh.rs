//! Scheduled token refresh.
//!
//! While permission stays granted the token is re-acquired on a fixed
//! interval for the lifetime of the page session. The schedule is a plain
//! tokio task; dropping or shutting it down aborts the task so no timer
//! outlives its page.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use brasa_core::events::PushEvent;
use brasa_core::types::PermissionState;

use super::manager::PushTokenManager;

/// Handle to a running refresh schedule.
#[derive(Debug)]
pub struct RefreshSchedule {
    handle: JoinHandle<()>,
}

impl RefreshSchedule {
    /// Stop the schedule.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for RefreshSchedule {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl PushTokenManager {
    /// Start the periodic refresh for this manager.
    ///
    /// The interval comes from `messaging.token_refresh_days`. Each tick
    /// re-runs the load pipeline when permission is still granted; the
    /// in-flight guard keeps a tick from stacking on a user-triggered
    /// load.
    pub fn start_refresh(self: &Arc<Self>) -> RefreshSchedule {
        let manager = Arc::clone(self);
        let interval =
            Duration::from_secs(u64::from(manager.config.token_refresh_days) * 24 * 60 * 60);

        let handle = tokio::spawn(async move {
            loop {
                manager.clock.sleep(interval).await;

                if manager.permission().await != PermissionState::Granted {
                    debug!("Skipping token refresh, permission not granted");
                    continue;
                }

                debug!("Refreshing messaging token on schedule");
                if manager.load_token().await.is_some() {
                    manager.bus.emit(PushEvent::TokenRefreshed);
                }
            }
        });

        RefreshSchedule { handle }
    }
}
