//! Per-file store registry
//!
//! One [`DocumentStore`] per normalized path, so every operation on a file in
//! this process shares the same lock and cache entry.

use dashmap::DashMap;
use keypath_store::DocumentStore;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Concurrent map from normalized file path to its store
#[derive(Debug, Default)]
pub struct StoreRegistry {
    stores: DashMap<PathBuf, Arc<DocumentStore>>,
}

impl StoreRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store for `file`, created on first access
    pub fn get_or_create(&self, file: &Path) -> Arc<DocumentStore> {
        let key = normalize_path(file);
        if let Some(store) = self.stores.get(&key) {
            return Arc::clone(store.value());
        }
        let entry = self.stores.entry(key.clone()).or_insert_with(|| {
            tracing::debug!(path = %key.display(), "opening document store");
            Arc::new(DocumentStore::new(key))
        });
        Arc::clone(entry.value())
    }

    /// Store for `file`, if one exists
    #[must_use]
    pub fn get(&self, file: &Path) -> Option<Arc<DocumentStore>> {
        self.stores
            .get(&normalize_path(file))
            .map(|store| Arc::clone(store.value()))
    }

    /// Drop the store for `file`
    ///
    /// Callers still holding the store keep a working handle; the next access
    /// through the registry opens a fresh one.
    pub fn evict(&self, file: &Path) -> bool {
        self.stores.remove(&normalize_path(file)).is_some()
    }

    /// Drop every store
    pub fn clear(&self) {
        self.stores.clear();
    }

    /// Number of open stores
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Whether no store is open
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

/// Absolute, lexically normalized form of `path`
///
/// Relative paths are joined to the current directory; `.` is dropped and
/// `..` pops the previous component. Symlinks are not resolved.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
