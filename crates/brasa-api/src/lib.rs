//! # brasa-api
//!
//! HTTP API for the subscription store: token registration, the active
//! subscription listing, and health checks, with permissive CORS for
//! cross-origin widget contexts.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
