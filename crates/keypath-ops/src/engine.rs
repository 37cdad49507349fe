//! Key operations over JSON files
//!
//! Each mutating operation takes the file's store lock once, loads, checks
//! its precondition against the loaded document, edits it in memory and
//! saves once. A failed precondition leaves the file byte-for-byte unchanged.

use crate::config::EngineConfig;
use crate::error::{OperationError, OperationResult};
use crate::registry::StoreRegistry;
use keypath_resolver::{self as resolver, KeyPath, Resolution};
use keypath_store::{CacheStats, Document, DocumentStore, FileInfo, ValidationResult};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Entry point for all key operations
#[derive(Debug, Default)]
pub struct OperationEngine {
    config: EngineConfig,
    stores: StoreRegistry,
}

impl OperationEngine {
    /// Create engine
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        tracing::debug!(indent = config.indent, use_cache = config.use_cache, "creating operation engine");
        Self {
            config,
            stores: StoreRegistry::new(),
        }
    }

    /// Engine configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Store registry
    #[inline]
    #[must_use]
    pub fn stores(&self) -> &StoreRegistry {
        &self.stores
    }

    /// Value at `key_path`
    ///
    /// # Errors
    /// `INVALID_PATH`, load errors, or `KEY_NOT_FOUND`.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %file.as_ref().display(), key = key_path))]
    pub fn get_key(&self, file: impl AsRef<Path>, key_path: &str) -> OperationResult<Value> {
        let key = KeyPath::parse(key_path)?;
        self.read(file.as_ref(), |document, path| {
            resolver::resolve(document.root(), &key, Resolution::LiteralFirstThenSplit)
                .cloned()
                .map_err(|err| OperationError::from_path_error(path, err))
        })
    }

    /// Create `key_path` with `value`, building intermediate objects
    ///
    /// # Errors
    /// `KEY_EXISTS` if the path already resolves, `PATH_CONFLICT` if a
    /// non-object sits on the way, plus load and write errors.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %file.as_ref().display(), key = key_path))]
    pub fn add_key(&self, file: impl AsRef<Path>, key_path: &str, value: Value) -> OperationResult<()> {
        let key = KeyPath::parse(key_path)?;
        self.mutate(file.as_ref(), |document, path| {
            if resolver::exists(document.root(), &key) {
                return Err(OperationError::key_exists(path, key_path));
            }
            resolver::insert(document.root_mut(), &key, value)
                .map_err(|err| OperationError::from_path_error(path, err))?;
            tracing::info!(file = %path.display(), key = key_path, "added key");
            Ok(())
        })
    }

    /// Replace the value at an existing `key_path`
    ///
    /// # Errors
    /// `KEY_NOT_FOUND` if the path does not resolve, plus load and write errors.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %file.as_ref().display(), key = key_path))]
    pub fn update_key(&self, file: impl AsRef<Path>, key_path: &str, value: Value) -> OperationResult<()> {
        let key = KeyPath::parse(key_path)?;
        self.mutate(file.as_ref(), |document, path| {
            resolver::replace(document.root_mut(), &key, value)
                .map_err(|err| OperationError::from_path_error(path, err))?;
            tracing::info!(file = %path.display(), key = key_path, "updated key");
            Ok(())
        })
    }

    /// Move the value at `old_path` to `new_path`
    ///
    /// Equivalent to removing `old_path` and adding its value at `new_path`,
    /// committed with a single write.
    ///
    /// # Errors
    /// `SAME_KEY` before any file access when both paths are equal,
    /// `KEY_NOT_FOUND` for a missing source, `KEY_EXISTS` for an occupied
    /// destination, `PATH_CONFLICT` if the destination cannot be built.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %file.as_ref().display(), from = old_path, to = new_path))]
    pub fn rename_key(&self, file: impl AsRef<Path>, old_path: &str, new_path: &str) -> OperationResult<()> {
        if old_path == new_path {
            return Err(OperationError::SameKey {
                key: old_path.to_string(),
            });
        }
        let old_key = KeyPath::parse(old_path)?;
        let new_key = KeyPath::parse(new_path)?;

        self.mutate(file.as_ref(), |document, path| {
            if !resolver::exists(document.root(), &old_key) {
                return Err(OperationError::key_not_found(path, old_path));
            }
            if resolver::exists(document.root(), &new_key) {
                return Err(OperationError::key_exists(path, new_path));
            }
            let value = resolver::remove(document.root_mut(), &old_key)
                .map_err(|err| OperationError::from_path_error(path, err))?;
            resolver::insert(document.root_mut(), &new_key, value)
                .map_err(|err| OperationError::from_path_error(path, err))?;
            tracing::info!(file = %path.display(), from = old_path, to = new_path, "renamed key");
            Ok(())
        })
    }

    /// Delete `key_path` and return the removed value
    ///
    /// # Errors
    /// `KEY_NOT_FOUND` if the path does not resolve, plus load and write errors.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %file.as_ref().display(), key = key_path))]
    pub fn remove_key(&self, file: impl AsRef<Path>, key_path: &str) -> OperationResult<Value> {
        let key = KeyPath::parse(key_path)?;
        self.mutate(file.as_ref(), |document, path| {
            let removed = resolver::remove(document.root_mut(), &key)
                .map_err(|err| OperationError::from_path_error(path, err))?;
            tracing::info!(file = %path.display(), key = key_path, "removed key");
            Ok(removed)
        })
    }

    /// Immediate child keys at `key_path`, or root keys for `None`
    ///
    /// # Errors
    /// `KEY_NOT_FOUND`, `NOT_OBJECT`, `INVALID_PATH`, or load errors.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %file.as_ref().display(), key = key_path))]
    pub fn list_keys(&self, file: impl AsRef<Path>, key_path: Option<&str>) -> OperationResult<Vec<String>> {
        let key = key_path.map(KeyPath::parse).transpose()?;
        self.read(file.as_ref(), |document, path| {
            resolver::list_keys(document.root(), key.as_ref())
                .map_err(|err| OperationError::from_path_error(path, err))
        })
    }

    /// Whether `key_path` resolves
    ///
    /// # Errors
    /// `INVALID_PATH` or load errors; a missing key is `Ok(false)`.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %file.as_ref().display(), key = key_path))]
    pub fn key_exists(&self, file: impl AsRef<Path>, key_path: &str) -> OperationResult<bool> {
        let key = KeyPath::parse(key_path)?;
        self.read(file.as_ref(), |document, _| Ok(resolver::exists(document.root(), &key)))
    }

    /// Syntax report for the file, bypassing the cache
    #[must_use]
    pub fn validate_json(&self, file: impl AsRef<Path>) -> ValidationResult {
        let report = self.store(file.as_ref()).validate_syntax();
        tracing::debug!(file = %report.file, valid = report.valid, "validated file");
        report
    }

    /// File metadata and cache state
    #[must_use]
    pub fn file_info(&self, file: impl AsRef<Path>) -> FileInfo {
        self.store(file.as_ref()).file_info()
    }

    /// Cache counters for the file, if it has been opened
    #[must_use]
    pub fn cache_stats(&self, file: impl AsRef<Path>) -> Option<CacheStats> {
        self.stores.get(file.as_ref()).map(|store| store.cache_stats())
    }

    /// Drop the cached document for `file`
    pub fn clear_cache(&self, file: impl AsRef<Path>) {
        if let Some(store) = self.stores.get(file.as_ref()) {
            store.clear_cache();
        }
    }

    /// Drop the store for `file` from the registry
    pub fn evict(&self, file: impl AsRef<Path>) -> bool {
        self.stores.evict(file.as_ref())
    }

    fn store(&self, file: &Path) -> Arc<DocumentStore> {
        self.stores.get_or_create(file)
    }

    fn read<T>(
        &self,
        file: &Path,
        op: impl FnOnce(&Document, &Path) -> OperationResult<T>,
    ) -> OperationResult<T> {
        let store = self.store(file);
        let document = store.load(self.config.use_cache)?;
        op(&document, store.path())
    }

    fn mutate<T>(
        &self,
        file: &Path,
        op: impl FnOnce(&mut Document, &Path) -> OperationResult<T>,
    ) -> OperationResult<T> {
        let store = self.store(file);
        let mut guard = store.lock();
        let mut document = guard.load(self.config.use_cache)?;
        let output = op(&mut document, store.path())?;
        guard.save(document, self.config.indent)?;
        Ok(output)
    }
}
