//! Error types for document loading and persistence

use std::path::PathBuf;

/// Errors raised by [`DocumentStore`](crate::DocumentStore)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Target file absent at load time
    #[error("file {path} not found")]
    FileNotFound { path: PathBuf },

    /// File content is malformed JSON or its root is not an object
    #[error("file {path} contains invalid JSON: {message}")]
    InvalidJson { path: PathBuf, message: String },

    /// IO failure while inspecting or reading the file
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any failure on the write path (temp file, encode, sync, rename)
    #[error("failed to write {path} ({action}): {source}")]
    Write {
        path: PathBuf,
        action: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create read error for path
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create write error for path and failed step
    pub fn write(path: impl Into<PathBuf>, action: &'static str, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            action,
            source,
        }
    }

    /// Create invalid JSON error for path
    pub fn invalid_json(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidJson {
            path: path.into(),
            message: message.into(),
        }
    }

    /// File the error refers to
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::FileNotFound { path }
            | Self::InvalidJson { path, .. }
            | Self::Read { path, .. }
            | Self::Write { path, .. } => path,
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
