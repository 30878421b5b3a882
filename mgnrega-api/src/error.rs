//! Error Types for the Tracker API
//!
//! This module defines error handling for the HTTP layer:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//! - Conversions from the domain and policy errors
//!
//! All errors are serialized as JSON with appropriate HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mgnrega_core::{StorageError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::EXAMPLE_PERFORMANCE_QUERY;
use crate::policy::PolicyError;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Required query parameter is missing or blank
    MissingField,

    /// Request contains invalid input data
    InvalidInput,

    // ========================================================================
    // Server Errors (500)
    // ========================================================================
    /// Upstream fetch failed and no cached substitute exists
    UpstreamFailed,

    /// Record store operation failed
    DatabaseError,

    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::MissingField | ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,

            ErrorCode::UpstreamFailed | ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::MissingField => "Required field is missing",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::UpstreamFailed => "Failed to fetch data",
            ErrorCode::DatabaseError => "Database operation failed",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Underlying error message, for fetch failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Upstream response body or other structured context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,

    /// Example of a well-formed request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            error: None,
            details: None,
            example: None,
        }
    }

    /// Attach the underlying error message.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Add additional details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Missing query parameter, with a usage example.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("{} query parameter is required", field),
        )
        .with_example(EXAMPLE_PERFORMANCE_QUERY)
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Hard failure of the performance lookup.
    ///
    /// `details` is always present in the body, `null` when there is no
    /// upstream response to report.
    pub fn fetch_failed(
        code: ErrorCode,
        error: impl Into<String>,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self::new(code, ErrorCode::UpstreamFailed.default_message())
            .with_error(error)
            .with_details(details.unwrap_or(serde_json::Value::Null))
    }

    /// Create a DatabaseError.
    pub fn database_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::RequiredFieldMissing { field } => ApiError::missing_field(&field),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        tracing::error!("Storage error: {:?}", err);
        ApiError::database_error(ErrorCode::DatabaseError.default_message())
            .with_error(err.to_string())
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        let code = match &err {
            PolicyError::Upstream(_) => ErrorCode::UpstreamFailed,
            PolicyError::Storage(_) => ErrorCode::DatabaseError,
        };
        ApiError::fetch_failed(code, err.to_string(), err.details().cloned())
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use mgnrega_core::UpstreamError;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::MissingField.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::UpstreamFailed.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_field_carries_example() {
        let err = ApiError::missing_field("district");
        assert_eq!(err.code, ErrorCode::MissingField);
        assert_eq!(err.message, "district query parameter is required");
        assert_eq!(err.example.as_deref(), Some(EXAMPLE_PERFORMANCE_QUERY));
    }

    #[test]
    fn test_upstream_status_error_maps_to_fetch_failure() {
        let err: ApiError = PolicyError::from(UpstreamError::Status {
            status: 403,
            body: Some(serde_json::json!({"message": "Invalid key"})),
        })
        .into();

        assert_eq!(err.code, ErrorCode::UpstreamFailed);
        assert_eq!(err.message, "Failed to fetch data");
        assert_eq!(err.error.as_deref(), Some("Upstream returned status 403"));
        assert_eq!(err.details, Some(serde_json::json!({"message": "Invalid key"})));
    }

    #[test]
    fn test_fetch_failure_serializes_null_details() -> Result<(), serde_json::Error> {
        let err: ApiError =
            PolicyError::from(UpstreamError::Network("connection refused".to_string())).into();
        let json = serde_json::to_value(&err)?;

        assert_eq!(json["code"], "UPSTREAM_FAILED");
        assert_eq!(json["error"], "Network error: connection refused");
        assert!(json["details"].is_null());
        assert!(json.get("details").is_some());
        assert!(json.get("example").is_none());
        Ok(())
    }

    #[test]
    fn test_storage_error_conversion() {
        let err: ApiError = StorageError::LockPoisoned.into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_serialization_round_trip() -> Result<(), serde_json::Error> {
        let err = ApiError::missing_field("district");
        let json = serde_json::to_string(&err)?;

        assert!(json.contains("MISSING_FIELD"));
        let deserialized: ApiError = serde_json::from_str(&json)?;
        assert_eq!(deserialized, err);
        Ok(())
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::database_error("Connection failed");
        let display = format!("{}", err);

        assert!(display.contains("DatabaseError"));
        assert!(display.contains("Connection failed"));
    }
}
