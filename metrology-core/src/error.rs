// metrology-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetrologyError {
    // --- DOMAIN ERRORS (missing records, rule registry, lifecycle) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (store, IO, parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- REQUEST ERRORS (rejected before any store access) ---
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl MetrologyError {
    /// True when the error means "the referenced record does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MetrologyError::Domain(
                DomainError::ProductNotFound(_) | DomainError::ViolationNotFound(_)
            )
        )
    }
}

impl From<validator::ValidationErrors> for MetrologyError {
    fn from(err: validator::ValidationErrors) -> Self {
        MetrologyError::Validation(err.to_string())
    }
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for MetrologyError {
    fn from(err: std::io::Error) -> Self {
        MetrologyError::Infrastructure(InfrastructureError::Io(err))
    }
}
