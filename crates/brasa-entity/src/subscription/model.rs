//! Device subscription row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered push delivery target.
///
/// One row per device+app installation. The `token` column carries the
/// messaging credential issued by the push backend and is unique: a token
/// re-registered by the same device upserts rather than duplicating.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeviceSubscription {
    /// Row identifier.
    pub id: Uuid,
    /// Messaging token / endpoint for this installation.
    pub token: String,
    /// Delivery platform reported at registration, if known.
    pub platform: Option<String>,
    /// User agent of the registering device.
    pub user_agent: Option<String>,
    /// When the subscription was first registered.
    pub created_at: DateTime<Utc>,
    /// Last time the device re-registered or refreshed its token.
    pub last_active_at: DateTime<Utc>,
}

impl DeviceSubscription {
    /// Build a fresh subscription for a newly registered token.
    pub fn new(token: String, platform: Option<String>, user_agent: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            token,
            platform,
            user_agent,
            created_at: now,
            last_active_at: now,
        }
    }
}
