//! Server error types

use thiserror::Error;

/// Transport failures that end the serve loop
#[derive(Debug, Error)]
pub enum ServerError {
    /// Reading requests or writing responses failed
    #[error("transport I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be encoded
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type alias for the server
pub type ServerResult<T> = Result<T, ServerError>;
