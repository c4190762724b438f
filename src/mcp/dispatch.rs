//! Tool dispatch
//!
//! Single entry point for tool invocations: look up the descriptor, validate
//! arguments against its parameter triples, build the request, run it through
//! the transport, and shape the response. Stateless across calls; the only
//! side effect is the network call the transport performs.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::error::{Result, ToolError};
use crate::gmail::registry::{validate_args, ParamKind, Registry, ToolDescriptor};
use crate::gmail::request;
use crate::gmail::response;
use crate::gmail::transport::Transport;
use crate::mcp::types::Tool;

/// One tool invocation, as handed over by the MCP host.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub tool_name: String,
    pub arguments: Map<String, Value>,
    pub bearer_token: String,
}

/// The registry-backed dispatcher.
pub struct Dispatcher {
    registry: Registry,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(registry: Registry, transport: Arc<dyn Transport>) -> Self {
        Self { registry, transport }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Advertised tool list, with input schemas generated from the
    /// descriptors so the registry stays the single source of truth.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.registry
            .iter()
            .map(|descriptor| Tool {
                name: descriptor.name.to_string(),
                description: Some(descriptor.description.to_string()),
                input_schema: input_schema(descriptor),
            })
            .collect()
    }

    /// Run one tool call end to end.
    ///
    /// Validation failures short-circuit before any request is built or any
    /// network activity happens.
    pub async fn dispatch(&self, call: ToolCall) -> Result<Value> {
        let descriptor = self
            .registry
            .get(&call.tool_name)
            .ok_or_else(|| ToolError::UnknownTool {
                name: call.tool_name.clone(),
            })?;

        if call.bearer_token.is_empty() {
            return Err(ToolError::Auth {
                message: "no bearer token supplied".to_string(),
            });
        }

        validate_args(descriptor, &call.arguments)?;

        let request = request::build(descriptor, &call.arguments)?;

        tracing::info!(tool = descriptor.name, path = %request.path, "dispatching tool call");

        let raw = self.transport.execute(&request, &call.bearer_token).await?;
        response::shape(raw)
    }
}

/// JSON Schema for a descriptor's parameters.
fn input_schema(descriptor: &ToolDescriptor) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in descriptor.params {
        let schema = match param.kind {
            ParamKind::String => json!({"type": "string", "description": param.description}),
            ParamKind::Integer => json!({
                "type": "integer",
                "minimum": 0,
                "description": param.description,
            }),
            ParamKind::Boolean => json!({"type": "boolean", "description": param.description}),
            ParamKind::StringList => json!({
                "type": "array",
                "items": {"type": "string"},
                "description": param.description,
            }),
        };
        properties.insert(param.name.to_string(), schema);
        if param.required {
            required.push(Value::String(param.name.to_string()));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
    Value::Object(schema)
}
