//! Subscription store HTTP client.
//!
//! Thin client for the remote row store: register this device's token,
//! list the active fleet for diagnostics. A duplicate registration comes
//! back from the server as a success and is reported as such.

use async_trait::async_trait;

use brasa_core::error::{AppError, ErrorKind};
use brasa_core::result::AppResult;
use brasa_core::types::response::ApiResponse;
use brasa_entity::subscription::model::DeviceSubscription;
use brasa_entity::subscription::store::SaveOutcome;

/// Where the token manager persists tokens.
///
/// The HTTP client is the production implementation; tests substitute an
/// in-memory recorder.
#[async_trait]
pub trait SubscriptionSink: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a token remotely.
    async fn save_token(&self, token: &str) -> AppResult<SaveOutcome>;
}

/// HTTP client for the subscription store API.
#[derive(Debug, Clone)]
pub struct SubscriptionStoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl SubscriptionStoreClient {
    /// Create a client against a base URL.
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
        })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// List all active subscriptions.
    pub async fn list_active(&self) -> AppResult<Vec<DeviceSubscription>> {
        let response = self
            .http
            .get(format!("{}/api/subscriptions", self.base_url))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Subscription list failed", e)
            })?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Subscription list failed: {}",
                response.status()
            )));
        }

        let body: ApiResponse<Vec<DeviceSubscription>> = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                "Malformed subscription list response",
                e,
            )
        })?;

        Ok(body.data)
    }
}

#[async_trait]
impl SubscriptionSink for SubscriptionStoreClient {
    async fn save_token(&self, token: &str) -> AppResult<SaveOutcome> {
        if token.trim().is_empty() {
            return Err(AppError::validation("token is required"));
        }

        let response = self
            .http
            .post(format!("{}/api/subscriptions", self.base_url))
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Transient, "Token registration failed", e)
            })?;

        match response.status().as_u16() {
            201 => Ok(SaveOutcome::Created),
            // Already registered: the store treats it as success, so do we.
            200 => Ok(SaveOutcome::AlreadyRegistered),
            400 => {
                let message = response.text().await.unwrap_or_default();
                Err(AppError::validation(format!(
                    "Store rejected token: {message}"
                )))
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(AppError::transient(format!(
                    "Store error {status}: {message}"
                )))
            }
        }
    }
}
