//! Delivery platform identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The platforms a notification can be delivered to, and that the
/// app-shell runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android devices (native notification channels, tags).
    Android,
    /// Apple devices (APNs alerts, collapse identifiers).
    Ios,
    /// Desktop and other web browsers (webpush).
    Web,
}

impl Platform {
    /// Whether the platform fires a programmatic install prompt.
    ///
    /// iOS never does; installation there goes through the share-sheet
    /// instructions instead.
    pub fn supports_install_prompt(&self) -> bool {
        !matches!(self, Self::Ios)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Android => write!(f, "android"),
            Self::Ios => write!(f, "ios"),
            Self::Web => write!(f, "web"),
        }
    }
}
