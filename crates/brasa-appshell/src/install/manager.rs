//! Install-prompt manager.
//!
//! Captures the browser's installability signal and exposes one imperative
//! action to trigger it. The captured handle is single-use; the manager
//! clears its reference before awaiting the user's choice because the
//! underlying platform event cannot be reused regardless of outcome.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use brasa_core::events::{EventBus, InstallEvent};

use crate::platform::{InstallPrompt, PlatformProbe, PromptChoice};

/// Static guidance for platforms without a programmatic prompt.
const HOME_SCREEN_INSTRUCTIONS: &str =
    "Open the share menu and choose \"Add to Home Screen\" to install the app.";

/// Outcome of [`InstallPromptManager::prompt_install`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// No captured prompt exists; nothing was shown.
    Unavailable,
    /// The user accepted installation.
    Accepted,
    /// The user dismissed the prompt (or the prompt call failed).
    Dismissed,
}

impl InstallOutcome {
    /// Whether the user accepted.
    pub fn accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Transient install state, held in page-process memory only.
#[derive(Debug, Default)]
struct InstallPromptState {
    prompt: Option<Box<dyn InstallPrompt>>,
    installed: bool,
    installable: bool,
    dismissed: bool,
}

/// Read-only snapshot of the install state for UI binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallSnapshot {
    /// Whether the app runs installed.
    pub installed: bool,
    /// Whether a prompt is captured and unconsumed.
    pub installable: bool,
    /// Whether the user declined the last prompt.
    pub dismissed: bool,
}

/// Surfaces the install signal and drives the prompt.
#[derive(Debug)]
pub struct InstallPromptManager {
    probe: Arc<dyn PlatformProbe>,
    bus: EventBus,
    state: Mutex<InstallPromptState>,
}

impl InstallPromptManager {
    /// Create a manager for the current page session.
    ///
    /// The installed flag starts from the display-mode probe so a page
    /// opened inside the installed app reports correctly before any event
    /// fires.
    pub fn new(probe: Arc<dyn PlatformProbe>, bus: EventBus) -> Self {
        let installed = probe.is_standalone_display();
        Self {
            probe,
            bus,
            state: Mutex::new(InstallPromptState {
                installed,
                ..InstallPromptState::default()
            }),
        }
    }

    /// Capture the browser's install event.
    ///
    /// Fired at most once per eligible session by the browser. Whether the
    /// native mini-infobar is suppressed is host policy; this manager only
    /// stores the handle.
    pub async fn on_prompt_captured(&self, prompt: Box<dyn InstallPrompt>) {
        let mut state = self.state.lock().await;
        state.prompt = Some(prompt);
        state.installable = true;
        debug!("Install prompt captured");
        self.bus.emit(InstallEvent::PromptCaptured);
    }

    /// Show the captured prompt and wait for the user's choice.
    ///
    /// The handle is taken out of the state before the await: even a
    /// pending choice leaves no reusable reference behind.
    pub async fn prompt_install(&self) -> InstallOutcome {
        let prompt = {
            let mut state = self.state.lock().await;
            let Some(prompt) = state.prompt.take() else {
                return InstallOutcome::Unavailable;
            };
            state.installable = false;
            prompt
        };

        match prompt.prompt().await {
            Ok(PromptChoice::Accepted) => {
                // `appinstalled` arrives separately and flips `installed`;
                // the two signals are not ordered.
                let mut state = self.state.lock().await;
                state.dismissed = false;
                drop(state);
                self.bus.emit(InstallEvent::PromptAccepted);
                InstallOutcome::Accepted
            }
            Ok(PromptChoice::Dismissed) => {
                let mut state = self.state.lock().await;
                state.dismissed = true;
                drop(state);
                self.bus.emit(InstallEvent::PromptDismissed);
                InstallOutcome::Dismissed
            }
            Err(e) => {
                warn!(error = %e, "Install prompt failed");
                InstallOutcome::Dismissed
            }
        }
    }

    /// Handle the `appinstalled` signal.
    pub async fn on_app_installed(&self) {
        let mut state = self.state.lock().await;
        state.installed = true;
        state.installable = false;
        drop(state);
        self.bus.emit(InstallEvent::Installed);
    }

    /// Handle a display-mode change.
    ///
    /// Installation can also happen outside this manager's control, so the
    /// media-query change is handled as an independent signal.
    pub async fn on_display_mode_changed(&self, standalone: bool) {
        let mut state = self.state.lock().await;
        state.installed = standalone;
        drop(state);
        self.bus
            .emit(InstallEvent::DisplayModeChanged { standalone });
        if standalone {
            self.bus.emit(InstallEvent::Installed);
        }
    }

    /// Re-derive the installed flag from the display-mode probe.
    pub async fn check_installed(&self) -> bool {
        let standalone = self.probe.is_standalone_display();
        let mut state = self.state.lock().await;
        if standalone {
            state.installed = true;
        }
        state.installed
    }

    /// Clear the dismissed flag so the host can offer the prompt again.
    pub async fn reset_dismissed(&self) {
        self.state.lock().await.dismissed = false;
    }

    /// Static install instructions for platforms without a prompt.
    ///
    /// Returns `Some` on iOS, where no install event exists and the UI must
    /// show an instructions affordance instead.
    pub fn install_instructions(&self) -> Option<&'static str> {
        if self.probe.platform().supports_install_prompt() {
            None
        } else {
            Some(HOME_SCREEN_INSTRUCTIONS)
        }
    }

    /// Emit the instructions event for promptless platforms.
    pub fn request_instructions(&self) {
        if let Some(instructions) = self.install_instructions() {
            self.bus.emit(InstallEvent::InstructionsRequired {
                instructions: instructions.to_string(),
            });
        }
    }

    /// Current state snapshot.
    pub async fn snapshot(&self) -> InstallSnapshot {
        let state = self.state.lock().await;
        InstallSnapshot {
            installed: state.installed,
            installable: state.installable,
            dismissed: state.dismissed,
        }
    }
}
