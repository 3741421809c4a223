//! Service-worker lifecycle domain events.

use serde::{Deserialize, Serialize};

/// Events emitted by the service-worker controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerEvent {
    /// A worker registration completed.
    Registered {
        /// Scope the worker controls.
        scope: String,
    },
    /// Registration failed; the app continues without offline support.
    RegistrationFailed {
        /// Failure description.
        reason: String,
    },
    /// A new worker version is installed and waiting.
    ///
    /// The host page decides whether to reload immediately or prompt.
    UpdateAvailable,
    /// A new worker took control and the page reloaded once.
    ControllerChanged,
    /// Navigation preload could not be enabled; navigations fall back to
    /// plain network fetches.
    PreloadUnavailable {
        /// Failure description.
        reason: String,
    },
}
