//! Error types for directory operations

use thiserror::Error;

use crate::principal::PrincipalId;

/// Directory error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrgError {
    /// No principal is registered under this id
    #[error("Unknown principal: {0}")]
    UnknownPrincipal(PrincipalId),
}

/// Result type for directory operations.
pub type OrgResult<T> = Result<T, OrgError>;

impl OrgError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            OrgError::UnknownPrincipal(_) => "UNKNOWN_PRINCIPAL",
        }
    }
}
