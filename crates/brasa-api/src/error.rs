//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use brasa_core::error::{AppError, ErrorKind};
use brasa_core::types::response::ApiErrorResponse;

/// Newtype carrying an [`AppError`] out of a handler.
///
/// Axum's orphan rules prevent implementing `IntoResponse` for the core
/// error directly; handlers return `Result<_, AppErrorResponse>` and `?`
/// converts through `From`.
#[derive(Debug)]
pub struct AppErrorResponse(pub AppError);

impl From<AppError> for AppErrorResponse {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl IntoResponse for AppErrorResponse {
    fn into_response(self) -> Response {
        let AppErrorResponse(error) = self;

        let (status, error_code) = match &error.kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::PermissionDenied => (StatusCode::FORBIDDEN, "PERMISSION_DENIED"),
            ErrorKind::Unsupported => (StatusCode::NOT_IMPLEMENTED, "UNSUPPORTED"),
            ErrorKind::ServiceUnavailable | ErrorKind::Transient => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ErrorKind::ExternalService => (StatusCode::BAD_GATEWAY, "EXTERNAL_SERVICE"),
            ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::Internal => {
                tracing::error!(error = %error.message, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message: error.message.clone(),
            details: None,
        };

        (status, Json(body)).into_response()
    }
}
