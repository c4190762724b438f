//! MCP (Model Context Protocol) module
//!
//! Tool dispatch and the stdio JSON-RPC server surface.

pub mod dispatch;
pub mod server;
pub mod types;
