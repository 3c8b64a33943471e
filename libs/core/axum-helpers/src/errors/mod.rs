pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "code": 3001,
///   "error": "DUPLICATE_RODA",
///   "message": "Roda already exists",
///   "details": null
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// Structured details, e.g. per-field validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error type shared by every handler. Domain errors convert into it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),

    /// A failure with its own stable code, e.g. `DUPLICATE_RODA`.
    #[error("{code}: {message}")]
    Coded {
        status: StatusCode,
        code: ErrorCode,
        message: String,
    },
}

impl AppError {
    pub fn coded(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        AppError::Coded {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(e) => e.status(),
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Coded { status, .. } => *status,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (code, message, details) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = ErrorCode::JsonExtraction.code(), "JSON extraction error: {e}");
                (ErrorCode::JsonExtraction, e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), "Validation error: {e}");
                (
                    ErrorCode::ValidationError,
                    ErrorCode::ValidationError.default_message().to_string(),
                    serde_json::to_value(&e).ok(),
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {msg}");
                (ErrorCode::ValidationError, msg, None)
            }
            AppError::Unauthorized(msg) => {
                tracing::info!("Unauthorized: {msg}");
                (ErrorCode::Unauthorized, msg, None)
            }
            AppError::Forbidden(msg) => {
                tracing::info!("Forbidden: {msg}");
                (ErrorCode::Forbidden, msg, None)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {msg}");
                (ErrorCode::NotFound, msg, None)
            }
            AppError::Conflict(msg) => {
                tracing::info!("Conflict: {msg}");
                (ErrorCode::Conflict, msg, None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = ErrorCode::InternalError.code(), "Internal server error: {msg}");
                (
                    ErrorCode::InternalError,
                    ErrorCode::InternalError.default_message().to_string(),
                    None,
                )
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {msg}");
                (ErrorCode::ServiceUnavailable, msg, None)
            }
            AppError::Coded { code, message, .. } => {
                if status.is_server_error() {
                    tracing::error!(error_code = code.code(), "{code}: {message}");
                    (code, code.default_message().to_string(), None)
                } else {
                    tracing::info!(error_code = code.code(), "{code}: {message}");
                    (code, message, None)
                }
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Build an error response without going through [`AppError`].
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_coded_client_error_keeps_message() {
        let response = AppError::coded(
            StatusCode::CONFLICT,
            ErrorCode::AlreadyFinalized,
            "Roda 42 is already finalized",
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_of(response).await;
        assert_eq!(body.error, "ALREADY_FINALIZED");
        assert_eq!(body.code, 3003);
        assert_eq!(body.message, "Roda 42 is already finalized");
    }

    #[tokio::test]
    async fn test_server_errors_hide_internal_message() {
        let response = AppError::coded(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::PersistenceError,
            "connection reset by peer",
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body.error, "PERSISTENCE_ERROR");
        assert!(!body.message.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_401() {
        let response = AppError::Unauthorized("Missing token".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_of(response).await.error, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_validation_errors_include_details() {
        let mut errors = ValidationErrors::new();
        errors.add("tema", validator::ValidationError::new("required"));

        let response = AppError::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_of(response).await;
        assert_eq!(body.code, 1001);
        assert!(body.details.unwrap().get("tema").is_some());
    }
}
