use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Boundary error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Upstream model failures never become an `AppError`; they are folded into a
/// fallback analysis by the analyzer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedMediaType(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Programming errors bubbled up with `?`; no current handler path produces one.
    #[allow(dead_code)]
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::UnsupportedMediaType(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedMediaType(msg) => ("UNSUPPORTED_FILE_TYPE", msg.clone()),
            AppError::PayloadTooLarge(msg) => ("PAYLOAD_TOO_LARGE", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
