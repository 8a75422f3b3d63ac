//! Error types for DAP requests.

use thiserror::Error;
use wind_common::WindError;

/// Result type for DAP client operations.
pub type DapResult<T> = Result<T, DapError>;

/// Error types for DAP requests and response parsing.
#[derive(Error, Debug)]
pub enum DapError {
    /// Transport failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status or a DAP `Error { }` body
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The dataset does not exist (yet) on the server
    #[error("Dataset not published: {0}")]
    NotPublished(String),

    /// A variable the caller relies on is not declared by the dataset
    #[error("Missing variable: {0}")]
    MissingVariable(String),

    /// The response could not be parsed
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// Transfer cache I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DapError {
    /// Whether a dataset probe that failed this way should move on to the
    /// next candidate rather than be reported as a protocol fault.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DapError::Http(_)
                | DapError::Server { .. }
                | DapError::NotPublished(_)
                | DapError::MissingVariable(_)
        )
    }
}

impl From<DapError> for WindError {
    fn from(err: DapError) -> Self {
        match err {
            DapError::Io(e) => WindError::Io(e),
            DapError::InvalidFormat(msg) => WindError::Protocol(msg),
            other if other.is_unavailable() => WindError::RemoteUnavailable(other.to_string()),
            other => WindError::Protocol(other.to_string()),
        }
    }
}
