/// Weather Forecast Tool
///
/// Two dependent lookups: coordinates resolve to a forecast URL through
/// `/points`, then that URL yields the forecast periods. Only the first
/// few periods are shown, in the order the API returns them.

use serde::Deserialize;
use serde_json::Value;

use crate::core::error::ToolError;
use crate::core::protocol::CallToolResult;
use crate::core::registry::ToolRegistry;
use crate::core::schema::{FieldKind, ObjectSchema};
use crate::tools::nws::{ForecastPeriod, NwsClient, or_default};

pub const NAME: &str = "get_forecast";

pub const MAX_PERIODS: usize = 5;

#[derive(Debug, Deserialize)]
struct ForecastArgs {
    latitude: f64,
    longitude: f64,
}

pub fn schema() -> ObjectSchema {
    ObjectSchema::new()
        .required(
            "latitude",
            FieldKind::Number { min: Some(-90.0), max: Some(90.0) },
            "Latitude of the location",
        )
        .required(
            "longitude",
            FieldKind::Number { min: Some(-180.0), max: Some(180.0) },
            "Longitude of the location",
        )
}

fn temperature_text(temperature: Option<&Value>) -> String {
    match temperature {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => "Unknown".to_string(),
    }
}

pub fn format_period(period: &ForecastPeriod) -> String {
    [
        format!("{}:", or_default(period.name.as_deref(), "Unknown")),
        format!(
            "Temperature: {}°{}",
            temperature_text(period.temperature.as_ref()),
            or_default(period.temperature_unit.as_deref(), "F")
        ),
        format!(
            "Wind: {} {}",
            or_default(period.wind_speed.as_deref(), "Unknown"),
            or_default(period.wind_direction.as_deref(), "")
        ),
        or_default(period.short_forecast.as_deref(), "No forecast available").to_string(),
        "---".to_string(),
    ]
    .join("\n")
}

async fn get_forecast(client: NwsClient, args: ForecastArgs) -> Result<CallToolResult, ToolError> {
    let ForecastArgs { latitude, longitude } = args;

    let Some(points) = client.points(latitude, longitude).await else {
        return Ok(CallToolResult::text(format!(
            "Failed to retrieve grid point data for coordinates: {}, {}. \
             This location may not be supported by the NWS API (only US locations are supported).",
            latitude, longitude
        )));
    };

    let Some(forecast_url) = points.forecast_url() else {
        return Ok(CallToolResult::text("Failed to get forecast URL from grid point data"));
    };

    let Some(forecast) = client.forecast(forecast_url).await else {
        return Ok(CallToolResult::text("Failed to retrieve forecast data"));
    };

    let periods = forecast.periods();
    if periods.is_empty() {
        return Ok(CallToolResult::text("No forecast periods available"));
    }

    let formatted: Vec<String> = periods.iter().take(MAX_PERIODS).map(format_period).collect();
    Ok(CallToolResult::text(format!(
        "Forecast for {}, {}:\n\n{}",
        latitude,
        longitude,
        formatted.join("\n")
    )))
}

pub fn register(registry: &mut ToolRegistry, client: NwsClient) {
    registry.register_typed(
        NAME,
        "Get weather forecast for a location",
        schema(),
        move |args: ForecastArgs| get_forecast(client.clone(), args),
    );
}
