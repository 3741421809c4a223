//! Response body definitions.

use serde::{Deserialize, Serialize};

/// Body of a successful token registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTokenResponse {
    /// Outcome description.
    pub message: String,
}

/// Body of the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status string.
    pub status: String,
    /// Whether the subscription store responds.
    pub store: bool,
    /// Number of registered subscriptions.
    pub subscriptions: u64,
}
