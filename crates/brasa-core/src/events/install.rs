//! Install-prompt domain events.

use serde::{Deserialize, Serialize};

/// Events emitted by the install-prompt manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InstallEvent {
    /// The browser surfaced an installability signal and the prompt handle
    /// was captured.
    PromptCaptured,
    /// The user accepted the install prompt.
    PromptAccepted,
    /// The user dismissed the install prompt.
    PromptDismissed,
    /// The app finished installing (`appinstalled` or display-mode change).
    Installed,
    /// The display mode changed.
    DisplayModeChanged {
        /// Whether the app now runs standalone.
        standalone: bool,
    },
    /// Installation is not promptable on this platform; the UI should show
    /// the static add-to-home-screen instructions instead.
    InstructionsRequired {
        /// Instruction text for the platform.
        instructions: String,
    },
}
