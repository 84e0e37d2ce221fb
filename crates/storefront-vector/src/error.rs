//! Error types for encoder and vector store collaborators

use thiserror::Error;

use crate::config::ConfigError;

/// Collaborator error types.
///
/// These cover every way an encoder or a vector store can fail. They are
/// operation failures, never authorization decisions.
#[derive(Debug, Error)]
pub enum VectorError {
    /// HTTP request failed (connection, timeout, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The index service returned an error response.
    #[error("Index API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the service.
        message: String,
    },

    /// The index service returned a body we could not interpret.
    #[error("Invalid index response: {0}")]
    InvalidResponse(String),

    /// A vector did not have the index's dimension.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension of the index.
        expected: usize,
        /// Dimension of the offending vector.
        actual: usize,
    },

    /// The store has no index to serve the call.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// An index with this name already exists.
    #[error("Index already exists: {0}")]
    IndexExists(String),

    /// A created index did not become ready in time.
    #[error("Index not ready: {0}")]
    IndexNotReady(String),

    /// The embedding encoder could not produce a vector.
    #[error("Encoder error: {0}")]
    Encoder(String),

    /// Collaborator configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for collaborator operations.
pub type VectorResult<T> = Result<T, VectorError>;

impl VectorError {
    /// Whether retrying the same call might succeed.
    ///
    /// Timeouts, connection failures, rate limiting and server errors are
    /// transient; everything else will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            VectorError::Request(e) => e.is_timeout() || e.is_connect(),
            VectorError::Api { status, .. } => *status == 429 || *status >= 500,
            VectorError::IndexNotReady(_) => true,
            _ => false,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            VectorError::Request(_) => "INDEX_UNREACHABLE",
            VectorError::Api { .. } => "INDEX_API_ERROR",
            VectorError::InvalidResponse(_) => "INDEX_INVALID_RESPONSE",
            VectorError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            VectorError::IndexNotFound(_) => "INDEX_NOT_FOUND",
            VectorError::IndexExists(_) => "INDEX_EXISTS",
            VectorError::IndexNotReady(_) => "INDEX_NOT_READY",
            VectorError::Encoder(_) => "ENCODER_ERROR",
            VectorError::Config(_) => "CONFIG_ERROR",
        }
    }
}
