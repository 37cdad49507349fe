//! Tool catalogue and execution
//!
//! Each tool maps onto one engine operation. Successful calls produce a text
//! summary plus structured content; engine failures become tool results with
//! `isError: true` and a `{code, message}` payload.

use keypath_ops::{OperationEngine, OperationError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Error code reported when a call exceeds its deadline
pub const TIMEOUT_CODE: &str = "TIMEOUT";

/// Arguments naming a file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileArgs {
    /// Target JSON file
    pub file_path: String,
}

/// Arguments naming a key in a file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyArgs {
    /// Target JSON file
    pub file_path: String,
    /// Dot-notation path
    pub key_path: String,
}

/// Arguments naming a key and a value
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValueArgs {
    /// Target JSON file
    pub file_path: String,
    /// Dot-notation path
    pub key_path: String,
    /// Any JSON value, `null` included
    pub value: Value,
}

/// Arguments for a rename
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenameArgs {
    /// Target JSON file
    pub file_path: String,
    /// Current path
    pub old_path: String,
    /// Destination path
    pub new_path: String,
}

/// Arguments for listing, with an optional key
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListArgs {
    /// Target JSON file
    pub file_path: String,
    /// Object to list, root when absent
    #[serde(default)]
    pub key_path: Option<String>,
}

/// A `tools/call` request decoded from `{name, arguments}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum ToolCall {
    /// Read a value
    GetKey(KeyArgs),
    /// Create a key
    AddKey(ValueArgs),
    /// Replace a value
    UpdateKey(ValueArgs),
    /// Move a value
    RenameKey(RenameArgs),
    /// Delete a key
    RemoveKey(KeyArgs),
    /// List child keys
    ListKeys(ListArgs),
    /// Test a path
    KeyExists(KeyArgs),
    /// Check syntax
    ValidateJson(FileArgs),
    /// Stat the file
    FileInfo(FileArgs),
}

/// Result payload of `tools/call`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    /// Human-readable content blocks
    pub content: Vec<TextContent>,
    /// Machine-readable payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    /// Whether the call failed
    #[serde(default)]
    pub is_error: bool,
}

/// Text content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// Always "text"
    #[serde(rename = "type")]
    pub kind: String,
    /// Content
    pub text: String,
}

impl ToolOutput {
    /// Successful output
    pub fn text(text: impl Into<String>, structured: Option<Value>) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text".to_string(),
                text: text.into(),
            }],
            structured_content: structured,
            is_error: false,
        }
    }

    /// Failed output with a stable code
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            content: vec![TextContent {
                kind: "text".to_string(),
                text: format!("Error [{code}]: {message}"),
            }],
            structured_content: Some(json!({ "code": code, "message": message })),
            is_error: true,
        }
    }

    /// Wrap an engine failure
    #[must_use]
    pub fn from_error(err: &OperationError) -> Self {
        Self::error(err.kind().code(), err.to_string())
    }
}

impl ToolCall {
    /// Tool name as advertised by `tools/list`
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetKey(_) => "get_key",
            Self::AddKey(_) => "add_key",
            Self::UpdateKey(_) => "update_key",
            Self::RenameKey(_) => "rename_key",
            Self::RemoveKey(_) => "remove_key",
            Self::ListKeys(_) => "list_keys",
            Self::KeyExists(_) => "key_exists",
            Self::ValidateJson(_) => "validate_json",
            Self::FileInfo(_) => "file_info",
        }
    }

    /// Run against the engine; blocking
    #[must_use]
    pub fn execute(self, engine: &OperationEngine) -> ToolOutput {
        match self.run(engine) {
            Ok(output) => output,
            Err(err) => {
                tracing::debug!(code = err.kind().code(), error = %err, "tool call failed");
                ToolOutput::from_error(&err)
            }
        }
    }

    fn run(self, engine: &OperationEngine) -> Result<ToolOutput, OperationError> {
        let output = match self {
            Self::GetKey(args) => {
                let value = engine.get_key(&args.file_path, &args.key_path)?;
                ToolOutput::text(pretty(&value), Some(json!({ "value": value })))
            }
            Self::AddKey(args) => {
                engine.add_key(&args.file_path, &args.key_path, args.value)?;
                ToolOutput::text(
                    format!("Added key '{}' to {}", args.key_path, args.file_path),
                    None,
                )
            }
            Self::UpdateKey(args) => {
                engine.update_key(&args.file_path, &args.key_path, args.value)?;
                ToolOutput::text(
                    format!("Updated key '{}' in {}", args.key_path, args.file_path),
                    None,
                )
            }
            Self::RenameKey(args) => {
                engine.rename_key(&args.file_path, &args.old_path, &args.new_path)?;
                ToolOutput::text(
                    format!(
                        "Renamed '{}' to '{}' in {}",
                        args.old_path, args.new_path, args.file_path
                    ),
                    None,
                )
            }
            Self::RemoveKey(args) => {
                let removed = engine.remove_key(&args.file_path, &args.key_path)?;
                ToolOutput::text(
                    format!(
                        "Removed key '{}' from {}\nRemoved value: {}",
                        args.key_path,
                        args.file_path,
                        pretty(&removed)
                    ),
                    Some(json!({ "removed": removed })),
                )
            }
            Self::ListKeys(args) => {
                let keys = engine.list_keys(&args.file_path, args.key_path.as_deref())?;
                let location = args
                    .key_path
                    .as_deref()
                    .map_or_else(|| "at root level".to_string(), |k| format!("at '{k}'"));
                let mut text = format!("Keys {location} in {}:", args.file_path);
                for key in &keys {
                    text.push_str("\n- ");
                    text.push_str(key);
                }
                ToolOutput::text(text, Some(json!({ "keys": keys })))
            }
            Self::KeyExists(args) => {
                let exists = engine.key_exists(&args.file_path, &args.key_path)?;
                let status = if exists { "exists" } else { "does not exist" };
                ToolOutput::text(
                    format!("Key '{}' {status} in {}", args.key_path, args.file_path),
                    Some(json!({ "exists": exists })),
                )
            }
            Self::ValidateJson(args) => {
                let report = engine.validate_json(&args.file_path);
                let text = match (&report.performance, &report.error) {
                    (Some(perf), _) => format!(
                        "{} is valid JSON\nFile size: {} bytes\nParse time: {:.3}s",
                        args.file_path, perf.file_size, perf.parse_time
                    ),
                    (None, Some(error)) => format!(
                        "{} contains invalid JSON\nError: {}\nLine: {}, column: {}",
                        args.file_path, error.message, error.line, error.column
                    ),
                    (None, None) => format!("{} contains invalid JSON", args.file_path),
                };
                ToolOutput::text(text, serde_json::to_value(&report).ok())
            }
            Self::FileInfo(args) => {
                let info = engine.file_info(&args.file_path);
                let structured = serde_json::to_value(&info).ok();
                let text = structured.as_ref().map_or_else(String::new, pretty);
                ToolOutput::text(text, structured)
            }
        };
        Ok(output)
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Tool descriptors for `tools/list`
#[must_use]
pub fn tool_definitions() -> Value {
    let file = json!({"type": "string", "description": "Path to the JSON file"});
    let key = json!({"type": "string", "description": "Dot-notation path (e.g. 'dashboard.title')"});
    let value = json!({"description": "Value to store (any JSON type)"});

    json!([
        {
            "name": "get_key",
            "description": "Get the value at a dot-notation path",
            "inputSchema": {
                "type": "object",
                "properties": {"file_path": file, "key_path": key},
                "required": ["file_path", "key_path"]
            }
        },
        {
            "name": "add_key",
            "description": "Add a new key, creating intermediate objects; fails if the key exists",
            "inputSchema": {
                "type": "object",
                "properties": {"file_path": file, "key_path": key, "value": value},
                "required": ["file_path", "key_path", "value"]
            }
        },
        {
            "name": "update_key",
            "description": "Replace the value of an existing key",
            "inputSchema": {
                "type": "object",
                "properties": {"file_path": file, "key_path": key, "value": value},
                "required": ["file_path", "key_path", "value"]
            }
        },
        {
            "name": "rename_key",
            "description": "Move a value to a new path in one write",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "file_path": file,
                    "old_path": {"type": "string", "description": "Current dot-notation path"},
                    "new_path": {"type": "string", "description": "New dot-notation path"}
                },
                "required": ["file_path", "old_path", "new_path"]
            }
        },
        {
            "name": "remove_key",
            "description": "Remove a key and return its value",
            "inputSchema": {
                "type": "object",
                "properties": {"file_path": file, "key_path": key},
                "required": ["file_path", "key_path"]
            }
        },
        {
            "name": "list_keys",
            "description": "List the immediate child keys of an object, or of the root",
            "inputSchema": {
                "type": "object",
                "properties": {"file_path": file, "key_path": key},
                "required": ["file_path"]
            }
        },
        {
            "name": "key_exists",
            "description": "Check whether a dot-notation path resolves",
            "inputSchema": {
                "type": "object",
                "properties": {"file_path": file, "key_path": key},
                "required": ["file_path", "key_path"]
            }
        },
        {
            "name": "validate_json",
            "description": "Check JSON syntax and report the error position",
            "inputSchema": {
                "type": "object",
                "properties": {"file_path": file},
                "required": ["file_path"]
            }
        },
        {
            "name": "file_info",
            "description": "Report existence, size, modification time and cache state",
            "inputSchema": {
                "type": "object",
                "properties": {"file_path": file},
                "required": ["file_path"]
            }
        }
    ])
}
