//! Error types for the Gmail MCP server
//!
//! Every tool invocation resolves to either a pass-through JSON payload or
//! one of the classified errors below. Errors are surfaced to the MCP host
//! unmodified; nothing here triggers a retry or crashes the process.

use thiserror::Error;

/// Classified failure of a single tool call.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Tool name is not present in the registry
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },

    /// A required argument is missing or has the wrong type
    #[error("invalid argument '{field}': {message}")]
    InvalidArgument { field: String, message: String },

    /// A registry descriptor exists without a request builder rule
    #[error("no request builder for tool: {name}")]
    UnsupportedOperation { name: String },

    /// Gmail rejected the bearer token (401/403), or no token was supplied
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// Gmail returned 404 for the addressed resource
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Gmail returned 429 or a 5xx, or the connection failed; the caller may retry
    #[error("transient upstream failure: {message}")]
    TransientUpstream { message: String },

    /// Gmail returned a body we could not decode, or an unexpected status
    #[error("malformed upstream response: {message}")]
    UpstreamProtocol { message: String },

    /// The network operation exceeded the configured deadline
    #[error("request timed out: {message}")]
    Timeout { message: String },
}

impl ToolError {
    /// Stable machine-readable kind, reported to the host next to the message
    /// so it can decide on retry or user messaging.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::UnknownTool { .. } => "unknown_tool",
            ToolError::InvalidArgument { .. } => "invalid_argument",
            ToolError::UnsupportedOperation { .. } => "unsupported_operation",
            ToolError::Auth { .. } => "auth_error",
            ToolError::NotFound { .. } => "not_found",
            ToolError::TransientUpstream { .. } => "transient_upstream_error",
            ToolError::UpstreamProtocol { .. } => "upstream_protocol_error",
            ToolError::Timeout { .. } => "timeout",
        }
    }

    /// Shorthand for a missing/ill-typed argument error.
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        ToolError::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ToolError::Timeout {
                message: err.to_string(),
            }
        } else {
            ToolError::TransientUpstream {
                message: err.to_string(),
            }
        }
    }
}

/// Errors from the server process itself (stdio plumbing), as opposed to a
/// single tool call.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for tool call outcomes
pub type Result<T> = std::result::Result<T, ToolError>;
