use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The caller has no verified identity.
    #[error("unauthorized")]
    Unauthorized,
    /// Caller input failed a precondition.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// The write would break a uniqueness rule.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The book service did not acknowledge the change; nothing was committed
    /// locally.
    #[error("book service error: {0}")]
    Remote(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
