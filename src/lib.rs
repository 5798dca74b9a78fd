//! Minimal MCP tool servers speaking JSON-RPC over stdio.
//!
//! Two binaries share this library: `simple-mcp-server` (echo, calculator,
//! current_time) and `weather-mcp-server` (NWS alerts and forecasts).

pub mod core;
pub mod tools;

pub use crate::core::protocol::{CallToolResult, Content, McpServer, ServerInfo};
pub use crate::core::registry::ToolRegistry;
