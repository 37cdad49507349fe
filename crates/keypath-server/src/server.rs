//! Request loop and method dispatch

use crate::error::ServerResult;
use crate::protocol::{
    parse_line, Request, Response, RpcError, INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND,
};
use crate::tools::{tool_definitions, ToolCall, ToolOutput, TIMEOUT_CODE};
use keypath_ops::OperationEngine;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Protocol revision announced by `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name announced by `initialize`
pub const SERVER_NAME: &str = "keypath";

/// JSON-RPC server over a shared engine
#[derive(Debug, Clone)]
pub struct Server {
    engine: Arc<OperationEngine>,
    timeout: Duration,
}

impl Server {
    /// Create server
    #[must_use]
    pub fn new(engine: Arc<OperationEngine>, timeout: Duration) -> Self {
        Self { engine, timeout }
    }

    /// Serve until the reader reaches end of input
    ///
    /// Requests are handled one at a time, in order.
    ///
    /// # Errors
    /// I/O failures on either stream.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> ServerResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }
        tracing::info!("input closed, shutting down");
        Ok(())
    }

    /// Handle one raw input line
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        if line.trim().is_empty() {
            return None;
        }
        match parse_line(line) {
            Ok(request) => self.handle(request).await,
            Err(response) => {
                tracing::warn!(error = ?response.error, "rejected request");
                Some(response)
            }
        }
    }

    /// Dispatch one request
    pub async fn handle(&self, request: Request) -> Option<Response> {
        tracing::debug!(method = %request.method, id = ?request.id, "request");
        if request.is_notification() {
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);

        let outcome = match request.method.as_str() {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}},
                "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")}
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tool_definitions() })),
            "tools/call" => self.call_tool(request.params.unwrap_or(Value::Null)).await,
            other => Err(RpcError::new(METHOD_NOT_FOUND, format!("Method not found: {other}"))),
        };

        Some(match outcome {
            Ok(result) => Response::success(id, result),
            Err(error) => Response::failure(id, error),
        })
    }

    async fn call_tool(&self, params: Value) -> Result<Value, RpcError> {
        let call: ToolCall = serde_json::from_value(params)
            .map_err(|e| RpcError::new(INVALID_PARAMS, format!("Invalid params: {e}")))?;
        let name = call.name();

        let engine = Arc::clone(&self.engine);
        let task = tokio::task::spawn_blocking(move || call.execute(&engine));
        let output = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(output)) => output,
            Ok(Err(join)) => {
                tracing::error!(tool = name, error = %join, "tool task failed");
                return Err(RpcError::new(INTERNAL_ERROR, format!("Tool {name} failed: {join}")));
            }
            Err(_) => {
                tracing::warn!(tool = name, timeout = ?self.timeout, "tool call timed out");
                ToolOutput::error(
                    TIMEOUT_CODE,
                    format!("{name} did not complete within {} ms", self.timeout.as_millis()),
                )
            }
        };

        serde_json::to_value(output)
            .map_err(|e| RpcError::new(INTERNAL_ERROR, format!("Failed to encode result: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keypath_ops::EngineConfig;

    fn server() -> Server {
        Server::new(
            Arc::new(OperationEngine::new(EngineConfig::new())),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn initialize_announces_tools() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
    }

    #[tokio::test]
    async fn notifications_and_blank_lines_are_silent() {
        let server = server();
        assert!(server.handle_line("   ").await.is_none());
        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn unknown_method() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":"x","method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(response.id, json!("x"));
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_tool_is_invalid_params() {
        let response = server()
            .handle_line(
                r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"nope","arguments":{}}}"#,
            )
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }
}
