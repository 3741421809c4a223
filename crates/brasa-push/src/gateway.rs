//! Push backend seams.
//!
//! The permission surface and the token-issuing gateway are traits so the
//! token manager runs against fakes in tests; the HTTP sender is the
//! production implementation used by the dispatch job.

use async_trait::async_trait;

use brasa_core::config::messaging::MessagingConfig;
use brasa_core::error::AppError;
use brasa_core::result::AppResult;
use brasa_core::types::PermissionState;

use crate::payload::platforms::PlatformPayload;

/// A push message observed while the page is foregrounded.
#[derive(Debug, Clone)]
pub struct ForegroundMessage {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
}

/// Handler invoked for foreground messages.
pub type ForegroundHandler = Box<dyn Fn(ForegroundMessage) + Send + Sync>;

/// The notification permission surface of the platform.
#[async_trait]
pub trait NotificationPermissions: Send + Sync + std::fmt::Debug + 'static {
    /// Whether the notification API exists at all.
    fn supported(&self) -> bool;

    /// The current permission state, read without prompting.
    fn current(&self) -> PermissionState;

    /// Ask the user. Resolves to the resulting state; the platform shows
    /// its own consent UI.
    async fn request(&self) -> AppResult<PermissionState>;
}

/// The messaging backend that issues delivery tokens.
#[async_trait]
pub trait MessagingGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch (or refresh) the token for this installation.
    async fn fetch_token(&self, vapid_public_key: &str) -> AppResult<String>;

    /// Install the foreground-message handler. Later installs replace the
    /// earlier one, so callers guard for once-only installation.
    fn set_foreground_handler(&self, handler: ForegroundHandler);
}

/// Sends one built payload to the push gateway.
#[async_trait]
pub trait PushSender: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver a single platform payload.
    async fn send(&self, payload: &PlatformPayload) -> AppResult<()>;
}

/// HTTP push sender posting payloads to the configured gateway endpoint.
#[derive(Debug, Clone)]
pub struct HttpPushSender {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpPushSender {
    /// Build a sender from the messaging configuration.
    pub fn new(config: &MessagingConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::with_source(
                brasa_core::error::ErrorKind::Internal,
                "Failed to build HTTP client",
                e,
            ))?;

        Ok(Self {
            http,
            endpoint: config
                .send_endpoint
                .replace("{project_id}", &config.project_id),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl PushSender for HttpPushSender {
    async fn send(&self, payload: &PlatformPayload) -> AppResult<()> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    brasa_core::error::ErrorKind::ExternalService,
                    "Push gateway request failed",
                    e,
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "Push gateway rejected payload: {status} {body}"
            )));
        }

        Ok(())
    }
}
