use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::{ml::ModelError, report::ReportError};

pub const MODEL_NOT_READY_MESSAGE: &str = "El modelo no esta listo. Revisa los logs del servidor.";
const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// API error types that can be returned from handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("model artifacts are not loaded")]
    ModelNotReady,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Inference failed: {0}")]
    Inference(#[from] ModelError),

    #[error("Report rendering failed: {0}")]
    Report(#[from] ReportError),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// Error body: `{"error": "..."}`
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ModelNotReady => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Inference(_) | ApiError::Report(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show the caller
    fn public_message(&self) -> String {
        match self {
            ApiError::ModelNotReady => MODEL_NOT_READY_MESSAGE.to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Inference(_) | ApiError::Report(_) | ApiError::InternalError(_) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Inference(_) | ApiError::Report(_) | ApiError::InternalError(_) => {
                tracing::error!(error = %self, "API error occurred");
            }
            ApiError::ModelNotReady => {
                tracing::warn!(error = %self, "Service unavailable");
            }
            ApiError::BadRequest(_) => {
                tracing::debug!(error = %self, "Client error");
            }
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(ApiError::ModelNotReady.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ApiError::BadRequest("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Inference(ModelError::NonFinite).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Report(ReportError::Pdf("boom".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = ApiError::Inference(ModelError::Dimension { expected: 6, actual: 5 });
        assert_eq!(err.public_message(), "An internal error occurred");
        assert!(err.to_string().contains("expected 6"));
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = ApiError::BadRequest("missing data".to_string());
        assert_eq!(err.public_message(), "missing data");
        assert_eq!(ApiError::ModelNotReady.public_message(), MODEL_NOT_READY_MESSAGE);
    }
}
