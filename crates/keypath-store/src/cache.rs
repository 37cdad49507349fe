//! Per-file document cache keyed on modification time

use crate::document::Document;
use serde::Serialize;
use std::time::SystemTime;

/// Statistics for cache behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Loads answered from the cache
    pub hits: u64,
    /// Loads that read and parsed the file
    pub reads: u64,
    /// Successful atomic writes
    pub writes: u64,
}

/// Last loaded document and the file mtime it was loaded at
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub(crate) document: Document,
    pub(crate) modified: SystemTime,
}

/// Mutable state behind the store mutex
#[derive(Debug, Default)]
pub(crate) struct CacheState {
    entry: Option<CacheEntry>,
    stats: CacheStats,
}

impl CacheState {
    /// Cached document if the recorded mtime still matches
    pub(crate) fn fresh(&mut self, modified: SystemTime) -> Option<Document> {
        let entry = self.entry.as_ref().filter(|e| e.modified == modified)?;
        self.stats.hits += 1;
        Some(entry.document.clone())
    }

    pub(crate) fn record_read(&mut self) {
        self.stats.reads += 1;
    }

    pub(crate) fn record_write(&mut self) {
        self.stats.writes += 1;
    }

    pub(crate) fn fill(&mut self, document: Document, modified: SystemTime) {
        self.entry = Some(CacheEntry { document, modified });
    }

    pub(crate) fn clear(&mut self) {
        self.entry = None;
    }

    pub(crate) fn is_cached(&self) -> bool {
        self.entry.is_some()
    }

    pub(crate) fn stats(&self) -> CacheStats {
        self.stats
    }
}
