//! Health check handlers.

use axum::Json;
use axum::extract::State;

use brasa_core::types::response::ApiResponse;

use crate::dto::response::HealthResponse;
use crate::error::AppErrorResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HealthResponse>>, AppErrorResponse> {
    let store = state.store.health_check().await.unwrap_or(false);
    let subscriptions = if store {
        state.store.count().await.unwrap_or(0)
    } else {
        0
    };

    Ok(Json(ApiResponse::ok(HealthResponse {
        status: if store { "ok" } else { "degraded" }.to_string(),
        store,
        subscriptions,
    })))
}
