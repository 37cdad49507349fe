//! File-backed document store with mtime cache and atomic writes
//!
//! One [`DocumentStore`] owns one file path. All access goes through a
//! [`StoreGuard`] so a load-mutate-save sequence runs under a single lock
//! acquisition and no two operations on the same file interleave in-process.

use crate::cache::{CacheState, CacheStats};
use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::validate::{validate_file, ValidationResult};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Indentation used for written documents unless configured otherwise
pub const DEFAULT_INDENT: usize = 2;

/// Information about the file behind a store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    /// Whether the file exists
    pub exists: bool,
    /// File path
    pub path: String,
    /// Size in bytes (if it exists)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Last modification time (if it exists)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,
    /// Whether a parsed document is cached
    pub is_cached: bool,
}

/// Consistent, mutually exclusive view of one JSON file
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    state: Mutex<CacheState>,
}

impl DocumentStore {
    /// Create store for a file path
    ///
    /// Nothing is read until the first load.
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(CacheState::default()),
        }
    }

    /// File path this store owns
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquire the store lock
    ///
    /// The lock is released when the guard drops, on every exit path.
    #[inline]
    pub fn lock(&self) -> StoreGuard<'_> {
        StoreGuard {
            path: &self.path,
            state: self.state.lock(),
        }
    }

    /// Load under a one-shot lock
    ///
    /// # Errors
    /// See [`StoreGuard::load`].
    pub fn load(&self, use_cache: bool) -> StoreResult<Document> {
        self.lock().load(use_cache)
    }

    /// Save under a one-shot lock
    ///
    /// # Errors
    /// See [`StoreGuard::save`].
    pub fn save(&self, document: Document, indent: usize) -> StoreResult<()> {
        self.lock().save(document, indent)
    }

    /// Drop the cached document, independent of file state
    pub fn clear_cache(&self) {
        self.lock().clear_cache();
    }

    /// Cache counters
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.state.lock().stats()
    }

    /// Check syntax, bypassing the cache
    #[must_use]
    pub fn validate_syntax(&self) -> ValidationResult {
        validate_file(&self.path)
    }

    /// Stat the file and report cache state
    #[must_use]
    pub fn file_info(&self) -> FileInfo {
        let is_cached = self.state.lock().is_cached();
        let meta = fs::metadata(&self.path).ok();
        FileInfo {
            exists: meta.is_some(),
            path: self.path.display().to_string(),
            size_bytes: meta.as_ref().map(fs::Metadata::len),
            modified_time: meta
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from),
            is_cached,
        }
    }
}

/// Exclusive access to a [`DocumentStore`]
#[derive(Debug)]
pub struct StoreGuard<'s> {
    path: &'s Path,
    state: MutexGuard<'s, CacheState>,
}

impl StoreGuard<'_> {
    /// Load the document
    ///
    /// With `use_cache`, a cached document whose recorded mtime equals the
    /// file's current mtime is returned without reading. The returned
    /// document is an owned copy; editing it never touches the cache.
    ///
    /// # Errors
    /// - [`StoreError::FileNotFound`] if the file is absent
    /// - [`StoreError::Read`] on any other IO failure
    /// - [`StoreError::InvalidJson`] on malformed content or a non-object root
    pub fn load(&mut self, use_cache: bool) -> StoreResult<Document> {
        let modified = modified_time(self.path)?;

        if use_cache {
            if let Some(document) = self.state.fresh(modified) {
                tracing::debug!(path = %self.path.display(), "cache hit");
                return Ok(document);
            }
        }

        let bytes = fs::read(self.path).map_err(|e| map_read_error(self.path, e))?;
        self.state.record_read();
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "read document");

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::invalid_json(self.path, e.to_string()))?;
        let document = Document::from_value(value)
            .ok_or_else(|| StoreError::invalid_json(self.path, "root value is not an object"))?;

        if use_cache {
            self.state.fill(document.clone(), modified);
        }
        Ok(document)
    }

    /// Atomically replace the file with `document`
    ///
    /// Writes to a temporary file in the same directory, then renames it over
    /// the target. On success the cache holds `document` at the new mtime.
    ///
    /// # Errors
    /// [`StoreError::Write`] for any failure; the original file is untouched.
    pub fn save(&mut self, document: Document, indent: usize) -> StoreResult<()> {
        write_atomic(self.path, &document, indent)?;
        self.state.record_write();

        match modified_time(self.path) {
            Ok(modified) => self.state.fill(document, modified),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot stat after save, dropping cache");
                self.state.clear();
            }
        }
        tracing::debug!(path = %self.path.display(), "saved document");
        Ok(())
    }

    /// Drop the cached document
    pub fn clear_cache(&mut self) {
        self.state.clear();
    }
}

fn modified_time(path: &Path) -> StoreResult<SystemTime> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| map_read_error(path, e))
}

fn map_read_error(path: &Path, err: io::Error) -> StoreError {
    if err.kind() == io::ErrorKind::NotFound {
        StoreError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        StoreError::read(path, err)
    }
}

fn write_atomic(path: &Path, document: &Document, indent: usize) -> StoreResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map_or_else(|| "document".into(), |n| n.to_string_lossy());

    // Dropping `temp` before `persist` removes the file.
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| StoreError::write(path, "create temp file", e))?;

    if let Ok(meta) = fs::metadata(path) {
        if let Err(e) = temp.as_file().set_permissions(meta.permissions()) {
            tracing::warn!(path = %path.display(), error = %e, "cannot copy permissions to temp file");
        }
    }

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        encode(&mut writer, document, indent)
            .map_err(|e| StoreError::write(path, "encode JSON", e.into()))?;
        writer
            .write_all(b"\n")
            .and_then(|()| writer.flush())
            .map_err(|e| StoreError::write(path, "write temp file", e))?;
    }
    temp.as_file()
        .sync_all()
        .map_err(|e| StoreError::write(path, "sync temp file", e))?;

    temp.persist(path)
        .map_err(|e| StoreError::write(path, "rename temp file", e.error))?;
    Ok(())
}

/// Serialize with `indent` spaces per level; 0 writes compact JSON
///
/// `serde_json` never escapes `<`, `>` or `&`, and writes non-ASCII verbatim.
fn encode<W: Write>(writer: W, document: &Document, indent: usize) -> serde_json::Result<()> {
    if indent == 0 {
        return serde_json::to_writer(writer, document);
    }
    let indent = vec![b' '; indent];
    let mut serializer =
        serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(&indent));
    document.serialize(&mut serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn write(path: &Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    fn bump_mtime(path: &Path, secs: u64) {
        let file = fs::OpenOptions::new().write(true).open(path).unwrap();
        let current = file.metadata().unwrap().modified().unwrap();
        file.set_modified(current + Duration::from_secs(secs)).unwrap();
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("missing.json"));
        assert!(matches!(store.load(true), Err(StoreError::FileNotFound { .. })));
    }

    #[test]
    fn load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        write(&path, "{invalid json");
        let store = DocumentStore::new(&path);
        assert!(matches!(store.load(true), Err(StoreError::InvalidJson { .. })));
    }

    #[test]
    fn load_rejects_non_object_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("array.json");
        write(&path, "[1, 2, 3]");
        let store = DocumentStore::new(&path);
        match store.load(true) {
            Err(StoreError::InvalidJson { message, .. }) => {
                assert!(message.contains("not an object"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn cached_load_skips_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        write(&path, r#"{"a": 1}"#);
        let store = DocumentStore::new(&path);

        store.load(true).unwrap();
        store.load(true).unwrap();
        let stats = store.cache_stats();
        assert_eq!(stats.reads, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn uncached_load_always_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        write(&path, r#"{"a": 1}"#);
        let store = DocumentStore::new(&path);

        store.load(false).unwrap();
        store.load(false).unwrap();
        assert_eq!(store.cache_stats().reads, 2);
        assert!(!store.file_info().is_cached);
    }

    #[test]
    fn save_refreshes_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        write(&path, r#"{"a": 1}"#);
        let store = DocumentStore::new(&path);

        let mut doc = store.load(true).unwrap();
        doc.root_mut().insert("b".into(), json!(2));
        store.save(doc.clone(), DEFAULT_INDENT).unwrap();

        let reloaded = store.load(true).unwrap();
        assert_eq!(reloaded, doc);
        let stats = store.cache_stats();
        assert_eq!(stats.reads, 1);
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn external_modification_invalidates_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        write(&path, r#"{"a": 1}"#);
        let store = DocumentStore::new(&path);
        store.load(true).unwrap();

        write(&path, r#"{"a": 2}"#);
        bump_mtime(&path, 5);

        let doc = store.load(true).unwrap();
        assert_eq!(doc.root()["a"], json!(2));
        assert_eq!(store.cache_stats().reads, 2);
    }

    #[test]
    fn clear_cache_forces_reread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        write(&path, r#"{"a": 1}"#);
        let store = DocumentStore::new(&path);

        store.load(true).unwrap();
        store.clear_cache();
        store.load(true).unwrap();
        assert_eq!(store.cache_stats().reads, 2);
    }

    #[test]
    fn edits_to_loaded_copy_do_not_leak_into_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        write(&path, r#"{"a": 1}"#);
        let store = DocumentStore::new(&path);

        let mut doc = store.load(true).unwrap();
        doc.root_mut().insert("scratch".into(), json!(true));

        let again = store.load(true).unwrap();
        assert!(!again.root().contains_key("scratch"));
    }

    #[test]
    fn save_writes_two_space_indent_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        write(&path, "{}");
        let store = DocumentStore::new(&path);

        let doc = Document::from_value(json!({"msg": "<b>Grüße</b> & more", "n": {"x": 1}})).unwrap();
        store.save(doc, DEFAULT_INDENT).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n  \"msg\": \"<b>Grüße</b> & more\",\n  \"n\": {\n    \"x\": 1\n  }\n}\n"
        );
    }

    #[test]
    fn save_with_zero_indent_is_compact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let store = DocumentStore::new(&path);

        store
            .save(Document::from_value(json!({"a": [1, 2]})).unwrap(), 0)
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":[1,2]}\n");
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        write(&path, "{}");
        let store = DocumentStore::new(&path);
        store.save(Document::new(), DEFAULT_INDENT).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["doc.json".to_string()]);
    }

    #[test]
    fn save_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("doc.json");
        let store = DocumentStore::new(&path);

        let result = store.save(Document::new(), DEFAULT_INDENT);
        assert!(matches!(result, Err(StoreError::Write { .. })));
        assert_eq!(store.cache_stats().writes, 0);
    }

    #[test]
    fn file_info_reports_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let store = DocumentStore::new(&path);
        assert!(!store.file_info().exists);

        write(&path, r#"{"k": true}"#);
        store.load(true).unwrap();
        let info = store.file_info();
        assert!(info.exists);
        assert!(info.is_cached);
        assert_eq!(info.size_bytes, Some(11));
        assert!(info.modified_time.is_some());
    }
}
