//! Client error types and conversions

use reqwest::StatusCode;
use thiserror::Error;

/// Client result type
pub type ClientResult<T> = Result<T, ClientError>;

/// Failure classes for a call against the camera backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The per-call timeout elapsed before a response arrived
    #[error("request timed out")]
    Timeout,

    /// Connection refused, reset, DNS failure and similar
    #[error("connection error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status
    #[error("HTTP error: {status}")]
    Http { status: StatusCode },

    /// Well-formed response carrying `success: false`
    #[error("{0}")]
    Application(String),

    /// Anything else, including payloads that do not match the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if let Some(status) = err.status() {
            ClientError::Http { status }
        } else if err.is_decode() {
            ClientError::Malformed(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Malformed(err.to_string())
    }
}
