//! Error types for moodprint
//!
//! Every terminal failure is caught at the run boundary and reported as one
//! `{ok: false, error}` body. A schema-invalid classification response is NOT
//! an error here — the validator turns it into a raw-fallback result.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::decoder::DecodeError;
use crate::services::ollama_client::ServiceError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Audio could not be decoded (500, terminal for the run)
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Classification endpoint failed (500, terminal for the run)
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Decode(_)
            | ApiError::Service(_)
            | ApiError::Internal(_)
            | ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "ok": false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_displays_bare_message() {
        let err = ApiError::BadRequest("Missing summary".to_string());
        assert_eq!(err.to_string(), "Missing summary");
    }

    #[test]
    fn service_error_carries_status_and_body() {
        let err = ApiError::from(ServiceError::Api {
            status: 503,
            body: "model loading".to_string(),
        });
        let message = err.to_string();
        assert!(message.contains("503"));
        assert!(message.contains("model loading"));
    }
}
