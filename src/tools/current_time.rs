/// Current Time Tool
///
/// Reads the local wall clock. Takes no arguments.

use chrono::{DateTime, Local, TimeZone};
use serde::Deserialize;

use crate::core::error::ToolError;
use crate::core::protocol::CallToolResult;
use crate::core::registry::ToolRegistry;
use crate::core::schema::ObjectSchema;

pub const NAME: &str = "current_time";

#[derive(Debug, Deserialize)]
struct NoArgs {}

/// Render a timestamp like `10/18/2026, 3:04:05 PM`.
pub fn format_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

async fn current_time(_args: NoArgs) -> Result<CallToolResult, ToolError> {
    let now = Local::now();
    Ok(CallToolResult::text(format!(
        "Current date and time: {}",
        format_timestamp(&now)
    )))
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register_typed(NAME, "Get the current date and time", ObjectSchema::new(), current_time);
}
