//! MCP server over stdio
//!
//! Line-delimited JSON-RPC on stdin/stdout. Logging goes to stderr so stdout
//! stays a clean protocol channel.

use std::io::{BufRead, Write};

use serde_json::Value;

use crate::config::{Config, TOKEN_ENV_VAR};
use crate::error::{ServerError, ToolError};
use crate::mcp::dispatch::{Dispatcher, ToolCall};
use crate::mcp::types::*;

const SERVER_NAME: &str = "gmail-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP server wiring the stdio loop to the dispatcher.
pub struct McpServer {
    dispatcher: Dispatcher,
    config: Config,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher, config: Config) -> Self {
        Self { dispatcher, config }
    }

    /// Run the server until stdin closes.
    pub async fn run_stdio(&self) -> Result<(), ServerError> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(&line).await {
                let response_str = serde_json::to_string(&response)?;
                writeln!(stdout, "{}", response_str)?;
                stdout.flush()?;
            }
        }

        Ok(())
    }

    /// Handle one incoming JSON-RPC message; `None` for notifications.
    async fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(req) => req,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    RequestId::Number(0),
                    JsonRpcError::parse_error(e.to_string()),
                ));
            }
        };

        // No id means a notification; those get no response, whatever the
        // method.
        let Some(id) = request.id else {
            match request.method.as_str() {
                methods::INITIALIZED => tracing::debug!("client completed initialization"),
                other => tracing::debug!(method = other, "ignoring notification"),
            }
            return None;
        };

        match request.method.as_str() {
            methods::INITIALIZE => Some(JsonRpcResponse::success(id, self.initialize_result())),
            methods::PING => Some(JsonRpcResponse::success(id, serde_json::json!({}))),
            methods::LIST_TOOLS => {
                let result = ListToolsResult {
                    tools: self.dispatcher.list_tools(),
                };
                Some(JsonRpcResponse::success(
                    id,
                    serde_json::to_value(result).unwrap_or_default(),
                ))
            }
            methods::CALL_TOOL => {
                let result = self.handle_call_tool(request.params).await;
                Some(JsonRpcResponse::success(
                    id,
                    serde_json::to_value(result).unwrap_or_default(),
                ))
            }
            other => Some(JsonRpcResponse::error(
                id,
                JsonRpcError::method_not_found(other),
            )),
        }
    }

    fn initialize_result(&self) -> Value {
        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {}),
            },
        };
        serde_json::to_value(result).unwrap_or_default()
    }

    async fn handle_call_tool(&self, params: Option<Value>) -> CallToolResult {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => return CallToolResult::error(format!("invalid tool parameters: {e}")),
            },
            None => return CallToolResult::error("missing tool parameters"),
        };

        let arguments = match params.arguments {
            Value::Object(map) => map,
            Value::Null => serde_json::Map::new(),
            _ => return CallToolResult::error("tool arguments must be an object"),
        };

        // The credential provider hands the token over via the environment;
        // re-read per call so rotation takes effect without a restart.
        let bearer_token = match self.config.bearer_token() {
            Some(token) => token,
            None => {
                let err = ToolError::Auth {
                    message: format!("{TOKEN_ENV_VAR} is not set"),
                };
                return tool_error_result(&err);
            }
        };

        let call = ToolCall {
            tool_name: params.name,
            arguments,
            bearer_token,
        };

        match self.dispatcher.dispatch(call).await {
            Ok(value) => CallToolResult::json(&value),
            Err(err) => tool_error_result(&err),
        }
    }
}

/// Error result carrying the stable kind next to the message so the host can
/// decide on retry or user messaging.
fn tool_error_result(err: &ToolError) -> CallToolResult {
    CallToolResult::error(format!("[{}] {}", err.kind(), err))
}
