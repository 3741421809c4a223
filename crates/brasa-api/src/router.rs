//! Route definitions for the Brasa HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(subscription_routes())
        .merge(notification_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Subscription registration and listing
fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions",
            post(handlers::subscription::save_token),
        )
        .route(
            "/subscriptions",
            get(handlers::subscription::list_subscriptions),
        )
}

/// Notification dispatch
fn notification_routes() -> Router<AppState> {
    Router::new().route(
        "/notifications",
        post(handlers::notification::send_notification),
    )
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}
