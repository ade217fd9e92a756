//! Error types for the studio cache service
//!
//! `StorageError` stays inside the cache layer (every variant degrades to a
//! miss or a logged write failure). `ApiError` is what the HTTP surface returns.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Storage Error Enum ==
/// Failures reported by a persistent storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend refused the write because its quota is exhausted
    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The backend is not accessible in this context
    #[error("Storage access denied: {0}")]
    AccessDenied(String),

    /// Underlying I/O failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Returns true for the condition that triggers a cleanup-and-retry.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded(_))
    }
}

// == API Error Enum ==
/// Unified error type for the HTTP surface.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Key missing, expired or stale in both tiers
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Strategy name is not one of the known policies
    #[error("Unknown cache strategy: {0}")]
    UnknownStrategy(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) | ApiError::UnknownStrategy(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
