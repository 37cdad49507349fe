//! Engine configuration

use keypath_store::DEFAULT_INDENT;
use serde::{Deserialize, Serialize};

/// Operation engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Spaces per indentation level in written files (0 = compact)
    pub indent: usize,
    /// Reuse cached documents while the file mtime is unchanged
    pub use_cache: bool,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With indentation width
    #[inline]
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// With or without the read cache
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            use_cache: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.indent, 2);
        assert!(config.use_cache);
    }

    #[test]
    fn builder() {
        let config = EngineConfig::new().with_indent(4).with_cache(false);
        assert_eq!(config.indent, 4);
        assert!(!config.use_cache);
    }
}
