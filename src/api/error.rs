//! API error taxonomy and the uniform response envelope.
//!
//! Every handler error is converted at the boundary into
//! `{"status":"error","message":...}`. Validation problems carry their own
//! message; internal failures log the detail and show a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Result alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Handler-level errors, mapped to HTTP status codes at the boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or invalid request data.
    #[error("{0}")]
    Validation(String),
    /// The addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Storage, LLM, or other internal failure. Detail goes to logs only.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Internal(error) => {
                tracing::error!(error = ?error, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorEnvelope {
            status: "error",
            message,
        });
        (status, body).into_response()
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    status: &'static str,
    message: String,
}

/// Success response body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in the success envelope.
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            message: None,
            data,
        }
    }

    /// Wrap a payload with an additional human-readable message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let response = ApiError::validation("duration must be positive").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::not_found("practice session not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_hides_detail() {
        let response =
            ApiError::Internal(anyhow::anyhow!("connection refused (secret host)")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::success(42)).expect("serialize");
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"], 42);
        assert!(body.get("message").is_none());
    }
}
