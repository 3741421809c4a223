//! Push messaging backend configuration.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Push messaging backend configuration.
///
/// Carries the project identity of the external push service plus the
/// retry/refresh tuning for the token pipeline. Missing credentials disable
/// the messaging subsystem only; the rest of the application keeps running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Whether the messaging subsystem is enabled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Push backend project identifier.
    #[serde(default)]
    pub project_id: String,
    /// Push backend API key.
    #[serde(default)]
    pub api_key: String,
    /// Push backend sender identifier.
    #[serde(default)]
    pub sender_id: String,
    /// Push backend application identifier.
    #[serde(default)]
    pub app_id: String,
    /// VAPID public key handed to browsers when subscribing (URL-safe base64).
    #[serde(default)]
    pub vapid_public_key: String,
    /// Push gateway send endpoint.
    #[serde(default = "default_send_endpoint")]
    pub send_endpoint: String,
    /// How many times a failed token fetch is retried before giving up.
    #[serde(default = "default_fetch_retry_limit")]
    pub fetch_retry_limit: u32,
    /// Delay between token fetch retries, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Token refresh interval in days while permission stays granted.
    #[serde(default = "default_token_refresh_days")]
    pub token_refresh_days: u32,
    /// Window within which identical notifications collapse, in seconds.
    #[serde(default = "default_dedup_window")]
    pub dedup_window_seconds: u64,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            project_id: String::new(),
            api_key: String::new(),
            sender_id: String::new(),
            app_id: String::new(),
            vapid_public_key: String::new(),
            send_endpoint: default_send_endpoint(),
            fetch_retry_limit: default_fetch_retry_limit(),
            retry_delay_ms: default_retry_delay_ms(),
            token_refresh_days: default_token_refresh_days(),
            dedup_window_seconds: default_dedup_window(),
        }
    }
}

impl MessagingConfig {
    /// Validate the credential set, naming every missing field.
    ///
    /// Returns `Ok(())` when the subsystem can start. The error message lists
    /// each absent field so a misconfigured deployment is diagnosable from
    /// the startup log alone.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut missing = Vec::new();

        if self.project_id.trim().is_empty() {
            missing.push("messaging.project_id");
        }
        if self.api_key.trim().is_empty() {
            missing.push("messaging.api_key");
        }
        if self.sender_id.trim().is_empty() {
            missing.push("messaging.sender_id");
        }
        if self.app_id.trim().is_empty() {
            missing.push("messaging.app_id");
        }
        if self.vapid_public_key.trim().is_empty() {
            missing.push("messaging.vapid_public_key");
        }

        if !missing.is_empty() {
            return Err(AppError::configuration(format!(
                "Messaging disabled, missing configuration: {}",
                missing.join(", ")
            )));
        }

        if base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(self.vapid_public_key.trim())
            .is_err()
        {
            return Err(AppError::configuration(
                "messaging.vapid_public_key is not valid URL-safe base64",
            ));
        }

        Ok(())
    }

    /// Whether the subsystem is enabled and fully configured.
    pub fn is_operational(&self) -> bool {
        self.enabled && self.validate().is_ok()
    }
}

fn default_true() -> bool {
    true
}

fn default_send_endpoint() -> String {
    "https://fcm.googleapis.com/v1/projects/{project_id}/messages:send".to_string()
}

fn default_fetch_retry_limit() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_token_refresh_days() -> u32 {
    7
}

fn default_dedup_window() -> u64 {
    300
}
