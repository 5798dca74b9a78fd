/// Weather MCP Server Entry Point
///
/// Serves get_alerts and get_forecast backed by the National Weather
/// Service API. `NWS_API_BASE` and `NWS_TIMEOUT_SECS` tune the upstream.

use std::process::ExitCode;

use mcp_tool_servers::core::server;
use mcp_tool_servers::tools::{self, nws::NwsClient};

fn main() -> ExitCode {
    server::run_main("weather-mcp-server", "1.0.0", |config| {
        let client = NwsClient::new(config.nws_api_base.clone(), config.nws_timeout)?;
        Ok(tools::weather_registry(client))
    })
}
