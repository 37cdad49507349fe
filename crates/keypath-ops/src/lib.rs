//! Keypath Operations
//!
//! Create, read, update, rename, delete and list keys in JSON files using
//! dot-notation paths, plus syntax validation.
//!
//! # Guarantees
//!
//! - All operations on one file are serialized through its store lock
//! - A mutating operation that fails leaves the file unchanged
//! - Key order is preserved; new keys are appended to their parent
//!
//! # Example
//!
//! ```rust,no_run
//! use keypath_ops::{EngineConfig, OperationEngine};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), keypath_ops::OperationError> {
//! let engine = OperationEngine::new(EngineConfig::new());
//! engine.add_key("locales/en.json", "dashboard.title", json!("Dashboard"))?;
//! engine.rename_key("locales/en.json", "dashboard.title", "dashboard.heading")?;
//! assert_eq!(engine.get_key("locales/en.json", "dashboard.heading")?, json!("Dashboard"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod engine;
pub mod error;
pub mod registry;

pub use config::EngineConfig;
pub use engine::OperationEngine;
pub use error::{ErrorKind, OperationError, OperationResult};
pub use registry::{normalize_path, StoreRegistry};

pub use keypath_store::{
    CacheStats, FileInfo, PerformanceMetrics, ValidationError, ValidationErrorType,
    ValidationResult,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
