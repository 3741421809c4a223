//! Subscription handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use validator::Validate;

use brasa_core::error::AppError;
use brasa_core::types::response::ApiResponse;
use brasa_entity::subscription::model::DeviceSubscription;
use brasa_entity::subscription::store::SaveOutcome;

use crate::dto::request::SaveTokenRequest;
use crate::dto::response::SaveTokenResponse;
use crate::error::AppErrorResponse;
use crate::state::AppState;

/// POST /api/subscriptions
///
/// `201` on a new registration, `200` when the token was already known
/// (duplicate submission is success), `400` on a missing/blank token.
pub async fn save_token(
    State(state): State<AppState>,
    Json(req): Json<SaveTokenRequest>,
) -> Result<Response, AppErrorResponse> {
    // `validate` catches the empty field; whitespace-only still counts as
    // missing.
    if req.validate().is_err() || req.token.trim().is_empty() {
        return Err(AppError::validation("token is required").into());
    }

    let subscription =
        DeviceSubscription::new(req.token.trim().to_string(), req.platform, req.user_agent);

    let (status, message) = match state.store.save(&subscription).await? {
        SaveOutcome::Created => (StatusCode::CREATED, "Subscription registered"),
        SaveOutcome::AlreadyRegistered => (StatusCode::OK, "Token already registered"),
    };

    tracing::info!(outcome = %message, "Token registration handled");

    Ok((
        status,
        Json(ApiResponse::ok(SaveTokenResponse {
            message: message.to_string(),
        })),
    )
        .into_response())
}

/// GET /api/subscriptions
pub async fn list_subscriptions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DeviceSubscription>>>, AppErrorResponse> {
    let subscriptions = state.store.list_active().await?;
    Ok(Json(ApiResponse::ok(subscriptions)))
}
