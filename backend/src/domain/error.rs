use crate::domain::validation::ExpenseValidationError;

/// Failure of a single user action. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input rejected before reaching the store
    #[error(transparent)]
    Validation(#[from] ExpenseValidationError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
