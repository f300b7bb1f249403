use std::io;
use thiserror::Error;
use tokio::time::error::Elapsed as TimeElapsed;

pub type UpyResult<T> = Result<T, Error>;

/// Enum for every failure an operation can report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The remote path does not exist
    #[error("No such file or directory: {0}")]
    NotFound(String),
    /// A node of the wrong kind occupies the path
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    /// Any other exception raised by the remote interpreter, kept verbatim
    #[error("Remote: {0}")]
    Remote(String),
    /// The ready prompt did not reappear in time
    #[error("Timeout")]
    Timeout,
    /// Any errors related to local or transport I/O
    #[error("I/O: {0}")]
    IO(String),
    /// Path is not absolute or names the root where a node is required
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    /// Occurs when a recursive operation exceeds the configured depth
    #[error("Limit exceeded: {0}")]
    Limited(String),
    /// The remote side answered with something that could not be interpreted
    #[error("{0}")]
    UnexpectedBehavior(String),
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Self::IO(error.to_string())
    }
}

impl From<TimeElapsed> for Error {
    fn from(_: TimeElapsed) -> Self {
        Self::Timeout
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Self::UnexpectedBehavior(format!("invalid hex payload: {err}"))
    }
}

impl From<tokio_serial::Error> for Error {
    fn from(err: tokio_serial::Error) -> Self {
        Self::IO(err.to_string())
    }
}
