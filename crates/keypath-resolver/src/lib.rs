//! Keypath Resolver
//!
//! Pure dot-notation path resolution over `serde_json` documents. No I/O.
//!
//! # Resolution policies
//!
//! A dotted string is ambiguous when the root object holds a key that itself
//! contains dots. [`Resolution`] names the two ways the string is mapped:
//!
//! | Operation | Policy |
//! |---|---|
//! | get, exists, remove, list, update | [`Resolution::LiteralFirstThenSplit`] |
//! | add, rename destination | [`Resolution::SplitOnly`] |
//!
//! The literal match is attempted at the root only; `{"a": {"b.c": 1}}` is
//! not reachable through `"a.b.c"`.
//!
//! # Example
//!
//! ```rust
//! use keypath_resolver::{resolve, KeyPath, Resolution};
//! use serde_json::json;
//!
//! let doc = json!({"dashboard": {"title": "Dashboard"}});
//! let root = doc.as_object().unwrap();
//! let path = KeyPath::parse("dashboard.title").unwrap();
//!
//! let title = resolve(root, &path, Resolution::LiteralFirstThenSplit).unwrap();
//! assert_eq!(title, "Dashboard");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod path;
pub mod resolve;

pub use error::PathError;
pub use path::{KeyPath, Resolution, SEPARATOR};
pub use resolve::{
    create_parent, exists, insert, list_keys, remove, replace, resolve, resolve_mut, Object,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
