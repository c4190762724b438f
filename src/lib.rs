//! Gmail MCP server library
//!
//! A thin Model Context Protocol adapter over the Gmail REST API: each tool
//! maps nearly 1:1 onto one Gmail endpoint, authenticated by an externally
//! supplied OAuth2 bearer token.

pub mod config;
pub mod error;
pub mod gmail;
pub mod mcp;

pub use config::Config;
pub use error::{Result, ToolError};
