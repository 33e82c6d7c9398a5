use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Errors surfaced by repository implementations.
///
/// Backend failures are translated here so callers never match on Diesel or
/// r2d2 types.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested row does not exist or has been soft-deleted.
    #[error("entity not found")]
    NotFound,
    /// A uniqueness constraint rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    /// Stored data could not be turned into a valid domain value.
    #[error("validation error: {0}")]
    ValidationError(String),
    /// A transaction was driven through an invalid sequence of steps.
    #[error("invalid transaction state: {0}")]
    TransactionState(&'static str),
    /// Could not obtain a pooled connection.
    #[error("connection error: {0}")]
    ConnectionError(String),
    /// Any other database failure.
    #[error("database error: {0}")]
    DatabaseError(String),
    /// The blocking task running the store call panicked or was aborted.
    #[error("store task failed: {0}")]
    TaskFailed(String),
}

/// Convenient alias for results returned from repository functions.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DieselError> for RepositoryError {
    fn from(value: DieselError) -> Self {
        match value {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                RepositoryError::ConstraintViolation(info.message().to_string())
            }
            other => RepositoryError::DatabaseError(other.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(value: diesel::r2d2::PoolError) -> Self {
        RepositoryError::ConnectionError(value.to_string())
    }
}

impl From<tokio::task::JoinError> for RepositoryError {
    fn from(value: tokio::task::JoinError) -> Self {
        RepositoryError::TaskFailed(value.to_string())
    }
}
