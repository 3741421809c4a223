//! Notification permission tri-state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mirror of the browser/OS notification permission tri-state.
///
/// Read once on mount; transitions only through an explicit user-consent
/// request. `Denied` is terminal for the session: there is no programmatic
/// way to re-prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Never asked.
    Default,
    /// The user granted notification permission.
    Granted,
    /// The user denied notification permission.
    Denied,
}

impl PermissionState {
    /// Whether the state can never change again this session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Denied)
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}
