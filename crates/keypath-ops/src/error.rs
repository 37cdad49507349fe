//! Error types for document operations
//!
//! Every failure maps to one [`ErrorKind`] with a stable code, so a transport
//! can report it without parsing messages:
//! - Load failures (file missing, unreadable, malformed)
//! - Path failures (invalid, not found, conflict, not an object)
//! - Precondition failures (key exists, same key)
//! - Write failures

use keypath_resolver::PathError;
use keypath_store::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Stable error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Target file absent at load time
    FileNotFound,
    /// Content parses as malformed JSON, or the root is not an object
    InvalidJson,
    /// IO failure other than absence while reading
    FileReadError,
    /// Any failure while writing
    FileWriteError,
    /// Syntax validation failure
    ParseError,
    /// Path does not resolve
    KeyNotFound,
    /// Path already resolves
    KeyExists,
    /// Path string is structurally invalid
    InvalidPath,
    /// Creation needs an object where a non-object sits
    PathConflict,
    /// Listing through a non-object
    NotObject,
    /// Rename with identical source and destination
    SameKey,
}

impl ErrorKind {
    /// Stable code string
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::InvalidJson => "INVALID_JSON",
            Self::FileReadError => "FILE_READ_ERROR",
            Self::FileWriteError => "FILE_WRITE_ERROR",
            Self::ParseError => "PARSE_ERROR",
            Self::KeyNotFound => "KEY_NOT_FOUND",
            Self::KeyExists => "KEY_EXISTS",
            Self::InvalidPath => "INVALID_PATH",
            Self::PathConflict => "PATH_CONFLICT",
            Self::NotObject => "NOT_OBJECT",
            Self::SameKey => "SAME_KEY",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Main operation error type
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// Load or save failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Empty or otherwise unusable path string
    #[error("invalid path: {reason}")]
    InvalidPath { reason: String },

    /// Path does not resolve in the file
    #[error("key '{key}' not found in {}", file.display())]
    KeyNotFound { file: PathBuf, key: String },

    /// Path already resolves in the file
    #[error("key '{key}' already exists in {}", file.display())]
    KeyExists { file: PathBuf, key: String },

    /// Intermediate non-object blocks creation
    #[error("cannot create '{key}' in {} through non-object value at '{at}'", file.display())]
    PathConflict {
        file: PathBuf,
        key: String,
        at: String,
    },

    /// Listing target is not an object
    #[error("value at {location} in {} is not an object, cannot list keys", file.display())]
    NotObject { file: PathBuf, location: String },

    /// Rename source equals destination
    #[error("old and new key paths cannot be the same: '{key}'")]
    SameKey { key: String },
}

impl OperationError {
    /// Error category
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(StoreError::FileNotFound { .. }) => ErrorKind::FileNotFound,
            Self::Store(StoreError::InvalidJson { .. }) => ErrorKind::InvalidJson,
            Self::Store(StoreError::Read { .. }) => ErrorKind::FileReadError,
            Self::Store(StoreError::Write { .. }) => ErrorKind::FileWriteError,
            Self::InvalidPath { .. } => ErrorKind::InvalidPath,
            Self::KeyNotFound { .. } => ErrorKind::KeyNotFound,
            Self::KeyExists { .. } => ErrorKind::KeyExists,
            Self::PathConflict { .. } => ErrorKind::PathConflict,
            Self::NotObject { .. } => ErrorKind::NotObject,
            Self::SameKey { .. } => ErrorKind::SameKey,
        }
    }

    /// Attach file context to a resolver error
    pub fn from_path_error(file: &Path, err: PathError) -> Self {
        match err {
            PathError::InvalidPath { reason } => Self::InvalidPath { reason },
            PathError::KeyNotFound { path } => Self::KeyNotFound {
                file: file.to_path_buf(),
                key: path,
            },
            PathError::PathConflict { path, at } => Self::PathConflict {
                file: file.to_path_buf(),
                key: path,
                at,
            },
            PathError::NotObject { location } => Self::NotObject {
                file: file.to_path_buf(),
                location,
            },
        }
    }

    /// Create key-not-found error
    pub fn key_not_found(file: &Path, key: impl Into<String>) -> Self {
        Self::KeyNotFound {
            file: file.to_path_buf(),
            key: key.into(),
        }
    }

    /// Create key-exists error
    pub fn key_exists(file: &Path, key: impl Into<String>) -> Self {
        Self::KeyExists {
            file: file.to_path_buf(),
            key: key.into(),
        }
    }
}

impl From<PathError> for OperationError {
    /// Path errors raised before any file is involved
    fn from(err: PathError) -> Self {
        Self::from_path_error(Path::new(""), err)
    }
}

/// Result type alias for document operations
pub type OperationResult<T> = Result<T, OperationError>;
