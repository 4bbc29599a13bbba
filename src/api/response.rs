//! Response types for the workforce ledger API.
//!
//! This module defines the error response structures and the mapping from
//! [`LedgerError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<LedgerError> for ApiErrorResponse {
    fn from(error: LedgerError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            LedgerError::NotFound { entity, .. } => (
                StatusCode::NOT_FOUND,
                ApiError::with_details("NOT_FOUND", message, format!("No such {}", entity)),
            ),
            LedgerError::Validation { field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details("VALIDATION_ERROR", message, field),
            ),
            LedgerError::Duplicate { entity, .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "DUPLICATE",
                    message,
                    format!("A {} can only be recorded once per key", entity),
                ),
            ),
            LedgerError::Authentication { .. } => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("AUTHENTICATION_FAILED", "Invalid id or credential"),
            ),
            LedgerError::State { state, .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details("INVALID_STATE", message, state),
            ),
            LedgerError::Storage { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("STORAGE_ERROR", "Storage failure", message),
            ),
            LedgerError::ConfigNotFound { .. } | LedgerError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (LedgerError::not_found("employee", "EMP404"), StatusCode::NOT_FOUND),
            (LedgerError::validation("score", "too high"), StatusCode::BAD_REQUEST),
            (
                LedgerError::Duplicate {
                    entity: "monthly evaluation",
                    key: "EMP001 2025-03".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                LedgerError::Authentication {
                    id: "EMP001".to_string(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (
                LedgerError::State {
                    entity: "leave request",
                    id: "x".to_string(),
                    state: "approved".to_string(),
                    message: "request is no longer pending".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (LedgerError::storage("store is closed"), StatusCode::INTERNAL_SERVER_ERROR),
            (
                LedgerError::ConfigNotFound {
                    path: "ledger.yaml".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, status);
        }
    }

    #[test]
    fn test_authentication_error_does_not_echo_id() {
        let response: ApiErrorResponse = LedgerError::Authentication {
            id: "EMP001".to_string(),
        }
        .into();
        assert_eq!(response.error.code, "AUTHENTICATION_FAILED");
        assert!(!response.error.message.contains("EMP001"));
        assert!(response.error.details.is_none());
    }
}
