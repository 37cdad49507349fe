//! Keypath Store
//!
//! The boundary between JSON files on disk and in-memory documents.
//!
//! # Core Operations
//!
//! - **Load**: stat, reuse the cached parse if the mtime is unchanged, else
//!   read and parse
//! - **Save**: write a temp file in the same directory and rename it over the
//!   target
//! - **Validate**: syntax check with 1-based line/column, bypassing the cache
//!
//! # Architecture
//!
//! ```text
//! File System → stat/read → Document ─(edit)→ Document → temp file → rename → File System
//!                    ↑___________↓
//!                 CacheState (document + mtime), one per DocumentStore
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use keypath_store::{DocumentStore, DEFAULT_INDENT};
//!
//! let store = DocumentStore::new("translations.json");
//! let mut guard = store.lock();
//! let mut doc = guard.load(true)?;
//! doc.root_mut().insert("title".into(), "Dashboard".into());
//! guard.save(doc, DEFAULT_INDENT)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod document;
pub mod error;
pub mod store;
pub mod validate;

pub use cache::CacheStats;
pub use document::Document;
pub use error::{StoreError, StoreResult};
pub use store::{DocumentStore, FileInfo, StoreGuard, DEFAULT_INDENT};
pub use validate::{
    line_column, validate_file, PerformanceMetrics, ValidationError, ValidationErrorType,
    ValidationResult,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
