//! Notification dispatch handlers.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use brasa_core::error::AppError;
use brasa_core::types::response::ApiResponse;
use brasa_push::payload::builder::NotificationContent;
use brasa_worker::jobs::dispatch::DispatchReport;

use crate::dto::request::SendNotificationRequest;
use crate::error::AppErrorResponse;
use crate::state::AppState;

/// POST /api/notifications
///
/// Sends one notification to every registered subscription. Returns `503`
/// while the messaging backend is unconfigured; the rest of the API keeps
/// working.
pub async fn send_notification(
    State(state): State<AppState>,
    Json(req): Json<SendNotificationRequest>,
) -> Result<Json<ApiResponse<DispatchReport>>, AppErrorResponse> {
    if req.validate().is_err() {
        return Err(AppError::validation("title and body are required").into());
    }

    let Some(dispatcher) = &state.dispatcher else {
        return Err(AppError::service_unavailable("Messaging is not configured").into());
    };

    let mut content = NotificationContent::new(req.title, req.body);
    if let Some(link) = req.link {
        content = content.with_link(link);
    }

    let report = dispatcher.run(&content).await?;
    Ok(Json(ApiResponse::ok(report)))
}
