//! Request body definitions.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/subscriptions`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveTokenRequest {
    /// The messaging token to register.
    ///
    /// Defaults to empty when absent so a missing field reports the same
    /// `400` as a blank one.
    #[serde(default)]
    #[validate(length(min = 1, message = "token is required"))]
    pub token: String,
    /// Delivery platform reported by the client, if known.
    #[serde(default)]
    pub platform: Option<String>,
    /// User agent of the registering device.
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// Body of `POST /api/notifications`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendNotificationRequest {
    /// Notification title.
    #[validate(length(min = 1))]
    pub title: String,
    /// Notification body.
    #[validate(length(min = 1))]
    pub body: String,
    /// Click-through link.
    #[serde(default)]
    pub link: Option<String>,
}
