//! Error handling
//!
//! Application error type and its mapping onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::validation::ValidationErrors;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Record failed validation
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Malformed request that never reached validation
    #[error("{message}")]
    BadRequest {
        message: String,
        details: Option<ValidationErrors>,
    },

    /// Name cannot be turned into a storage key
    #[error("Invalid character name: {0}")]
    InvalidName(String),

    /// Target record already exists, or names disagree
    #[error("{0}")]
    Conflict(String),

    /// Target record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Write or delete could not complete
    #[error("Storage failure: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found() -> Self {
        AppError::NotFound("Character not found".to_string())
    }

    /// Message safe to show to clients; server-side causes stay in the log
    pub fn public_message(&self) -> String {
        match self {
            AppError::Storage(_) => "Storage operation failed".to_string(),
            AppError::Config(_)
            | AppError::Serialization(_)
            | AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    fn details(&self) -> Option<&ValidationErrors> {
        match self {
            AppError::Validation(errors) => Some(errors),
            AppError::BadRequest { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        AppError::Validation(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

/// Axum response implementation for AppError
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code): (u16, String) = (&self).into();
        if status >= 500 {
            tracing::error!(error = %self, code = %code, "request failed");
        }

        let mut body = ErrorResponse::new(&code, &self.public_message());
        if let Some(errors) = self.details() {
            body = body.with_details(errors);
        }
        (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(body),
        )
            .into_response()
    }
}

/// A single field-level problem in an error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDetail {
    pub field: String,
    pub message: String,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code
    pub code: String,
    /// Human readable message
    pub message: String,
    /// Field-level violations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldDetail>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, errors: &ValidationErrors) -> Self {
        self.details = errors
            .violations()
            .iter()
            .map(|v| FieldDetail {
                field: v.field().to_string(),
                message: v.to_string(),
            })
            .collect();
        self
    }
}

/// HTTP status code mapping
impl From<&AppError> for (u16, String) {
    fn from(err: &AppError) -> (u16, String) {
        match err {
            AppError::Validation(_) => (422, "VALIDATION_ERROR".to_string()),
            AppError::BadRequest { .. } => (400, "BAD_REQUEST".to_string()),
            AppError::InvalidName(_) => (400, "INVALID_NAME".to_string()),
            AppError::Conflict(_) => (400, "CONFLICT".to_string()),
            AppError::NotFound(_) => (404, "NOT_FOUND".to_string()),
            AppError::Storage(_) => (500, "STORAGE_ERROR".to_string()),
            AppError::Config(_) => (500, "CONFIG_ERROR".to_string()),
            _ => (500, "INTERNAL_ERROR".to_string()),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validation::FieldViolation;
    use axum::body::to_bytes;

    fn status_of(err: &AppError) -> u16 {
        let (status, _): (u16, String) = err.into();
        status
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(&AppError::Validation(ValidationErrors::new())), 422);
        assert_eq!(status_of(&AppError::bad_request("nope")), 400);
        assert_eq!(status_of(&AppError::InvalidName("..".into())), 400);
        assert_eq!(status_of(&AppError::Conflict("dup".into())), 400);
        assert_eq!(status_of(&AppError::not_found()), 404);
        assert_eq!(status_of(&AppError::Storage("disk full".into())), 500);
        assert_eq!(status_of(&AppError::Internal("oops".into())), 500);
    }

    #[test]
    fn test_storage_cause_is_not_exposed() {
        let err = AppError::Storage("permission denied: /secret/path".into());
        assert_eq!(err.public_message(), "Storage operation failed");
        assert!(err.to_string().contains("/secret/path"));
    }

    #[tokio::test]
    async fn test_validation_response_carries_details() {
        let errors = ValidationErrors::from(FieldViolation::MissingField {
            field: "race".to_string(),
        });
        let response = AppError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(
            body.details,
            vec![FieldDetail {
                field: "race".to_string(),
                message: "Required field 'race' is missing".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_not_found_message() {
        let response = AppError::not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, "Character not found");
        assert!(body.details.is_empty());
    }
}
