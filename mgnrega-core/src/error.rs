//! Error types for tracker operations

use std::time::Duration;
use thiserror::Error;

/// Request validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} query parameter is required")]
    RequiredFieldMissing { field: String },
}

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Connection pool error: {reason}")]
    Pool { reason: String },

    #[error("Query failed during {operation}: {reason}")]
    Query { operation: String, reason: String },

    #[error("Failed to decode cached payload for {key}: {reason}")]
    Serialization { key: String, reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Storage result alias.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors from the upstream open-data API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UpstreamError {
    #[error("Upstream request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Upstream returned status {status}")]
    Status {
        status: u16,
        body: Option<serde_json::Value>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    /// Response body returned by the upstream alongside a failure, if any.
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            UpstreamError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}
