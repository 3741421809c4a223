//! Navigation request interception, worker-side.
//!
//! The handler is a pure function over the request plus its optional
//! preload response. Navigations prefer the preload when it was enabled at
//! activate time, fall back to the network, and degrade to a synthetic
//! `503` instead of letting the navigation hard-fail. Everything else
//! passes through untouched; asset caching is not this handler's concern.

use std::sync::atomic::{AtomicBool, Ordering};

use http::StatusCode;
use tracing::{debug, warn};

use brasa_core::events::{EventBus, WorkerEvent};
use brasa_core::result::AppResult;

use crate::platform::{NetworkFetch, WorkerRegistration};

/// Body served when both the preload and the network fail.
const OFFLINE_BODY: &str = "Service temporarily unavailable. Please check your connection and try again.";

/// Request mode, as the worker sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// A top-level navigation.
    Navigate,
    /// Any non-navigation request (assets, API calls, ...).
    Subresource,
}

/// A request intercepted by the worker.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Request URL.
    pub url: String,
    /// Request method.
    pub method: String,
    /// Request mode.
    pub mode: RequestMode,
}

impl FetchRequest {
    /// A navigation request for a URL.
    pub fn navigation(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            mode: RequestMode::Navigate,
        }
    }

    /// A subresource request for a URL.
    pub fn subresource(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            mode: RequestMode::Subresource,
        }
    }

    /// Whether this is a navigation.
    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }
}

/// A response produced by the worker's fetch handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Content type header value.
    pub content_type: String,
    /// Response body.
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// An OK HTML response.
    pub fn html(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "text/html".to_string(),
            body: body.into(),
        }
    }

    /// The synthetic plain-text response for failed navigations.
    pub fn service_unavailable() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            content_type: "text/plain".to_string(),
            body: OFFLINE_BODY.as_bytes().to_vec(),
        }
    }
}

/// The worker's fetch handler, registered once at worker startup.
#[derive(Debug, Default)]
pub struct NavigationHandler {
    /// Set at activate time when navigation preload could be enabled.
    preload_enabled: AtomicBool,
}

impl NavigationHandler {
    /// Create a handler; preload starts disabled until activate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate-time hook: enable navigation preload, best-effort.
    ///
    /// Failure is recorded and the handler keeps checking availability per
    /// request instead of assuming it.
    pub async fn activate(&self, registration: &dyn WorkerRegistration, bus: &EventBus) {
        match registration.enable_navigation_preload().await {
            Ok(()) => {
                self.preload_enabled.store(true, Ordering::SeqCst);
                debug!("Navigation preload enabled");
            }
            Err(e) => {
                warn!(error = %e, "Navigation preload unavailable");
                bus.emit(WorkerEvent::PreloadUnavailable {
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Whether preload responses will be consulted.
    pub fn preload_enabled(&self) -> bool {
        self.preload_enabled.load(Ordering::SeqCst)
    }

    /// Handle one intercepted request.
    ///
    /// `preload` carries the navigation-preload response when the platform
    /// produced one for this request.
    pub async fn handle(
        &self,
        request: &FetchRequest,
        preload: Option<FetchResponse>,
        network: &dyn NetworkFetch,
    ) -> AppResult<FetchResponse> {
        if !request.is_navigation() {
            // Pass through: no caching policy lives here.
            return network.fetch(request).await;
        }

        if self.preload_enabled() {
            if let Some(response) = preload {
                debug!(url = %request.url, "Serving navigation from preload");
                return Ok(response);
            }
        }

        match network.fetch(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                warn!(url = %request.url, error = %e, "Navigation fetch failed, serving 503");
                Ok(FetchResponse::service_unavailable())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use brasa_core::AppError;

    use super::*;

    #[derive(Debug)]
    enum Network {
        Up(FetchResponse),
        Down,
    }

    #[async_trait]
    impl NetworkFetch for Network {
        async fn fetch(&self, _request: &FetchRequest) -> AppResult<FetchResponse> {
            match self {
                Self::Up(response) => Ok(response.clone()),
                Self::Down => Err(AppError::transient("network unreachable")),
            }
        }
    }

    #[derive(Debug)]
    struct PreloadReady;

    #[async_trait]
    impl WorkerRegistration for PreloadReady {
        fn scope(&self) -> String {
            "/".to_string()
        }
        async fn enable_navigation_preload(&self) -> AppResult<()> {
            Ok(())
        }
        async fn unregister(&self) -> AppResult<()> {
            Ok(())
        }
    }

    #[derive(Debug)]
    struct PreloadBroken;

    #[async_trait]
    impl WorkerRegistration for PreloadBroken {
        fn scope(&self) -> String {
            "/".to_string()
        }
        async fn enable_navigation_preload(&self) -> AppResult<()> {
            Err(AppError::unsupported("no preload on this platform"))
        }
        async fn unregister(&self) -> AppResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn prefers_preload_when_enabled() {
        let handler = NavigationHandler::new();
        handler.activate(&PreloadReady, &EventBus::new()).await;

        let preloaded = FetchResponse::html("<p>preloaded</p>");
        let response = handler
            .handle(
                &FetchRequest::navigation("/menu"),
                Some(preloaded.clone()),
                &Network::Down,
            )
            .await
            .unwrap();

        assert_eq!(response, preloaded);
    }

    #[tokio::test]
    async fn ignores_preload_when_enable_failed() {
        let handler = NavigationHandler::new();
        handler.activate(&PreloadBroken, &EventBus::new()).await;
        assert!(!handler.preload_enabled());

        let network = Network::Up(FetchResponse::html("<p>network</p>"));
        let response = handler
            .handle(
                &FetchRequest::navigation("/menu"),
                Some(FetchResponse::html("<p>stale preload</p>")),
                &network,
            )
            .await
            .unwrap();

        assert_eq!(response.body, b"<p>network</p>");
    }

    #[tokio::test]
    async fn failed_navigation_becomes_synthetic_503() {
        let handler = NavigationHandler::new();

        let response = handler
            .handle(&FetchRequest::navigation("/events"), None, &Network::Down)
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.content_type, "text/plain");
        assert!(!response.body.is_empty());
    }

    #[tokio::test]
    async fn subresources_pass_through() {
        let handler = NavigationHandler::new();

        let err = handler
            .handle(
                &FetchRequest::subresource("/assets/logo.png"),
                None,
                &Network::Down,
            )
            .await
            .unwrap_err();

        // No synthetic response for non-navigations; the failure
        // propagates untouched.
        assert!(err.is_retryable());
    }
}
