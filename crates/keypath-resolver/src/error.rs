//! Error types for path resolution

/// Errors raised while resolving or editing a path in a document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Path string is structurally invalid (empty)
    #[error("invalid path: {reason}")]
    InvalidPath { reason: String },

    /// Path does not resolve to a value
    #[error("key '{path}' not found")]
    KeyNotFound { path: String },

    /// Creation needs an object where a non-object value sits
    #[error("cannot create '{path}' through non-object value at '{at}'")]
    PathConflict { path: String, at: String },

    /// Listing target is not an object
    #[error("value at {location} is not an object, cannot list keys")]
    NotObject { location: String },
}

impl PathError {
    /// Create key-not-found error for the full path
    pub fn key_not_found(path: impl Into<String>) -> Self {
        Self::KeyNotFound { path: path.into() }
    }

    /// Create path conflict error
    pub fn path_conflict(path: impl Into<String>, at: impl Into<String>) -> Self {
        Self::PathConflict {
            path: path.into(),
            at: at.into(),
        }
    }

    /// Create not-object error for a listing target
    ///
    /// `None` names the root.
    pub fn not_object(path: Option<&str>) -> Self {
        let location = match path {
            Some(p) => format!("'{p}'"),
            None => "root".to_string(),
        };
        Self::NotObject { location }
    }
}
