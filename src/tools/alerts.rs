/// Weather Alerts Tool
///
/// Active NWS alerts for a two-letter US state code.

use serde::Deserialize;

use crate::core::error::ToolError;
use crate::core::protocol::CallToolResult;
use crate::core::registry::ToolRegistry;
use crate::core::schema::{FieldKind, ObjectSchema};
use crate::tools::nws::{AlertFeature, AlertProperties, NwsClient, or_default};

pub const NAME: &str = "get_alerts";

#[derive(Debug, Deserialize)]
struct AlertsArgs {
    state: String,
}

pub fn schema() -> ObjectSchema {
    ObjectSchema::new().required(
        "state",
        FieldKind::String { exact_len: Some(2) },
        "Two-letter US state code (e.g. CA, NY)",
    )
}

pub fn format_alert(feature: &AlertFeature) -> String {
    let fallback = AlertProperties::default();
    let props = feature.properties.as_ref().unwrap_or(&fallback);
    [
        format!("Event: {}", or_default(props.event.as_deref(), "Unknown")),
        format!("Area: {}", or_default(props.area_desc.as_deref(), "Unknown")),
        format!("Severity: {}", or_default(props.severity.as_deref(), "Unknown")),
        format!(
            "Description: {}",
            or_default(props.description.as_deref(), "No description available")
        ),
        format!(
            "Instructions: {}",
            or_default(props.instruction.as_deref(), "No specific instructions provided")
        ),
        "---".to_string(),
    ]
    .join("\n")
}

async fn get_alerts(client: NwsClient, args: AlertsArgs) -> Result<CallToolResult, ToolError> {
    let state = args.state.to_uppercase();

    let Some(alerts) = client.alerts(&state).await else {
        return Ok(CallToolResult::text("Failed to retrieve alerts data"));
    };

    if alerts.features.is_empty() {
        return Ok(CallToolResult::text(format!("No active alerts for {}", state)));
    }

    let formatted: Vec<String> = alerts.features.iter().map(format_alert).collect();
    Ok(CallToolResult::text(format!(
        "Active alerts for {}:\n\n{}",
        state,
        formatted.join("\n")
    )))
}

pub fn register(registry: &mut ToolRegistry, client: NwsClient) {
    registry.register_typed(
        NAME,
        "Get weather alerts for a US state",
        schema(),
        move |args: AlertsArgs| get_alerts(client.clone(), args),
    );
}
