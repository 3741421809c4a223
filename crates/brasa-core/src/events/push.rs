//! Push/notification domain events.

use serde::{Deserialize, Serialize};

use crate::types::permission::PermissionState;

/// Events emitted by the push-token manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PushEvent {
    /// Notification permission changed.
    PermissionChanged {
        /// The new permission state.
        state: PermissionState,
    },
    /// A messaging token was fetched and registered.
    TokenReady {
        /// The registered token.
        token: String,
    },
    /// The token was refreshed on schedule.
    TokenRefreshed,
    /// Token acquisition gave up after exhausting its retry budget.
    ///
    /// Emitted at most once per terminal failure; the UI shows a single
    /// toast for it.
    TokenFailed {
        /// Human-readable failure description.
        reason: String,
        /// How many attempts were made.
        attempts: u32,
    },
    /// A push message arrived while the page was in the foreground.
    ForegroundMessage {
        /// Notification title.
        title: String,
        /// Notification body.
        body: String,
    },
    /// Push requires the app to be installed to the home screen first.
    InstallRequired {
        /// Guidance text for the platform.
        instructions: String,
    },
}
