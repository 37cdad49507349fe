//! JSON-RPC 2.0 framing
//!
//! One request per line in, one response per line out. Requests without an
//! `id` are notifications and never get a response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version string
pub const JSONRPC_VERSION: &str = "2.0";

/// Invalid JSON was received
pub const PARSE_ERROR: i64 = -32700;
/// The JSON sent is not a valid request object
pub const INVALID_REQUEST: i64 = -32600;
/// The method does not exist
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Invalid method parameters
pub const INVALID_PARAMS: i64 = -32602;
/// Internal server error
pub const INTERNAL_ERROR: i64 = -32603;

/// Incoming request or notification
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Request {
    /// Must be "2.0"
    pub jsonrpc: String,
    /// Absent for notifications
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Option<Value>,
}

impl Request {
    /// Whether no response is expected
    #[inline]
    #[must_use]
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Error member of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// JSON-RPC error code
    pub code: i64,
    /// Short description
    pub message: String,
}

impl RpcError {
    /// Create error
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Outgoing response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Echo of the request id, `null` if it could not be read
    pub id: Value,
    /// Present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    /// Success response
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Error response
    #[must_use]
    pub fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Parse one input line into a request
///
/// # Errors
/// A ready-to-send error response: `PARSE_ERROR` for malformed JSON,
/// `INVALID_REQUEST` for JSON that is not a request object.
pub fn parse_line(line: &str) -> Result<Request, Response> {
    let raw: Value = serde_json::from_str(line).map_err(|e| {
        Response::failure(Value::Null, RpcError::new(PARSE_ERROR, format!("Parse error: {e}")))
    })?;

    let id = raw.get("id").cloned().unwrap_or(Value::Null);
    let request: Request = serde_json::from_value(raw).map_err(|e| {
        Response::failure(
            id.clone(),
            RpcError::new(INVALID_REQUEST, format!("Invalid request: {e}")),
        )
    })?;

    if request.jsonrpc != JSONRPC_VERSION {
        return Err(Response::failure(
            id,
            RpcError::new(INVALID_REQUEST, "Invalid request: jsonrpc must be \"2.0\""),
        ));
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_request() {
        let request = parse_line(r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#).unwrap();
        assert_eq!(request.id, Some(json!(7)));
        assert_eq!(request.method, "ping");
        assert!(request.params.is_none());
        assert!(!request.is_notification());
    }

    #[test]
    fn notification_has_no_id() {
        let request =
            parse_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
        assert!(request.is_notification());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let response = parse_line("{nope").unwrap_err();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);
    }

    #[test]
    fn missing_method_is_invalid_request() {
        let response = parse_line(r#"{"jsonrpc":"2.0","id":"a"}"#).unwrap_err();
        assert_eq!(response.id, json!("a"));
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn wrong_version_is_invalid_request() {
        let response = parse_line(r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#).unwrap_err();
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn response_omits_absent_members() {
        let text = serde_json::to_string(&Response::success(json!(1), json!({}))).unwrap();
        assert_eq!(text, r#"{"jsonrpc":"2.0","id":1,"result":{}}"#);
    }
}
