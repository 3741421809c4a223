//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use brasa_api::AppState;
use brasa_core::config::AppConfig;
use brasa_database::memory::MemorySubscriptionStore;
use brasa_entity::subscription::store::SubscriptionStore;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Direct handle on the backing store
    pub store: Arc<dyn SubscriptionStore>,
}

impl TestApp {
    /// Create a new test application over the in-memory store.
    pub fn new() -> Self {
        let config = Arc::new(AppConfig::default());
        let store: Arc<dyn SubscriptionStore> = Arc::new(MemorySubscriptionStore::new());
        let state = AppState::new(config, Arc::clone(&store), None);

        Self {
            router: brasa_api::build_app(state),
            store,
        }
    }

    /// POST a JSON body and return status + parsed response body.
    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");

        self.send(request).await
    }

    /// GET a path and return status + parsed response body.
    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("request");

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, body)
    }
}
