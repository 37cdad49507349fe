//! Keypath Server
//!
//! Exposes the key operations as tools over newline-delimited JSON-RPC 2.0
//! on stdio.
//!
//! # Methods
//!
//! - `initialize`, `ping`
//! - `tools/list`: the tool catalogue with input schemas
//! - `tools/call`: run one tool; engine failures come back as results with
//!   `isError: true` and a `{code, message}` payload
//!
//! Each call runs on the blocking pool under a deadline.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::{command, ServerConfig, DEFAULT_TIMEOUT_MS};
pub use error::{ServerError, ServerResult};
pub use protocol::{Request, Response, RpcError};
pub use server::{Server, PROTOCOL_VERSION, SERVER_NAME};
pub use tools::{tool_definitions, ToolCall, ToolOutput};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
