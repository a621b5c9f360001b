use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use bp_tracker_domain::services::readings::ReadingServiceError;

/// Message shown when a request body is missing fields or carries non-numeric values
pub const INVALID_INPUT_MESSAGE: &str = "Please fill in all fields with valid numbers";

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn not_found(resource: &str) -> Self {
        Self {
            error: "not_found".to_string(),
            message: format!("The requested {} could not be found", resource),
            details: None,
        }
    }

    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "validation_error".to_string(),
            message: message.to_string(),
            details,
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    pub fn insufficient_data(message: &str) -> Self {
        Self {
            error: "insufficient_data".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    pub fn internal_error() -> Self {
        Self {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" | "insufficient_data" => StatusCode::NOT_FOUND,
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ReadingServiceError> for ErrorResponse {
    fn from(err: ReadingServiceError) -> Self {
        match err {
            ReadingServiceError::ValidationError(msg) => ErrorResponse::validation_error(&msg, None),
            ReadingServiceError::NotFound(_) => ErrorResponse::not_found("reading"),
            ReadingServiceError::InsufficientData(msg) => ErrorResponse::insufficient_data(&msg),
            ReadingServiceError::FormatError(msg) => ErrorResponse::bad_request(&msg),
            ReadingServiceError::RepositoryError(msg) => {
                error!("Storage failure: {}", msg);
                ErrorResponse::internal_error()
            }
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Count of readings affected by a bulk operation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CountResponse {
    pub count: usize,
}
