//! Error types for storefront service operations
//!
//! Only collaborator failures are errors. Authorization denials and missing
//! resources are reported through [`crate::Outcome`] instead.

use thiserror::Error;

use storefront_vector::VectorError;

/// Service error types.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The embedding encoder or vector store failed
    #[error("Collaborator failure: {0}")]
    Collaborator(#[from] VectorError),
}

/// Result type for service operations that call collaborators.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Whether the caller may retry the same operation.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Collaborator(e) => e.is_retryable(),
        }
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Collaborator(VectorError::DimensionMismatch { .. }) => 422,
            ServiceError::Collaborator(VectorError::Config(_)) => 500,
            ServiceError::Collaborator(VectorError::IndexExists(_)) => 409,
            ServiceError::Collaborator(VectorError::IndexNotReady(_)) => 503,
            ServiceError::Collaborator(_) => 502,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Collaborator(e) => e.error_code(),
        }
    }
}
