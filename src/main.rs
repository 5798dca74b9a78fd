/// Simple MCP Server Entry Point
///
/// Serves the echo, calculator and current_time tools. Transport and server
/// identity come from environment variables (see `core::config`).

use std::process::ExitCode;

use mcp_tool_servers::core::server;
use mcp_tool_servers::tools;

fn main() -> ExitCode {
    server::run_main("simple-mcp-server", "1.0.0", |_config| {
        Ok(tools::simple_registry())
    })
}
