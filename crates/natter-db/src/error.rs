use thiserror::Error;

/// A bad argument on a controller call. Always raised before any I/O.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be alphanumeric: {0:?}")]
    InvalidUsername(String),
    #[error("message body must not be empty")]
    EmptyMessage,
    #[error("message id must be a positive integer, got {0}")]
    InvalidMessageId(i64),
    #[error("author is not a stored user")]
    InvalidAuthor,
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("invalid argument: {0}")]
    Validation(#[from] ValidationError),

    #[error("username already taken: {0}")]
    UsernameTaken(String),

    /// Anything the store reported: connection, query, schema or a failed
    /// blocking task.
    #[error("persistence failure: {0:#}")]
    Persistence(anyhow::Error),
}

impl From<anyhow::Error> for ControllerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Persistence(err)
    }
}
