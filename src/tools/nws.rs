/// National Weather Service API Client
///
/// Thin wrapper over `reqwest` for api.weather.gov. Every request failure
/// (network error, non-2xx status, unexpected body) is logged and reported
/// as `None`; callers turn that into informative text, never an error.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;

use crate::core::error::ServerError;

pub const NWS_USER_AGENT: &str = "weather-app/1.0";
pub const NWS_ACCEPT: &str = "application/geo+json";

#[derive(Debug, Clone)]
pub struct NwsClient {
    http: reqwest::Client,
    base_url: String,
}

impl NwsClient {
    /// Build a client for `base_url`. `timeout` of `None` sets no request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ServerError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(NWS_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(NWS_ACCEPT));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let base_url: String = base_url.into();
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/alerts?area={STATE}`.
    pub async fn alerts(&self, state: &str) -> Option<AlertsResponse> {
        self.get_json(&format!("{}/alerts?area={}", self.base_url, state))
            .await
    }

    /// `GET {base}/points/{lat},{lon}` with 4 decimal places.
    pub async fn points(&self, latitude: f64, longitude: f64) -> Option<PointsResponse> {
        self.get_json(&points_url(&self.base_url, latitude, longitude))
            .await
    }

    /// `GET` the forecast URL a points lookup pointed at.
    pub async fn forecast(&self, url: &str) -> Option<ForecastResponse> {
        self.get_json(url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        tracing::debug!(url, "NWS request");

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url, error = %e, "error making NWS request");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "NWS request returned HTTP error");
            return None;
        }

        match response.json::<T>().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(url, error = %e, "malformed NWS response");
                None
            }
        }
    }
}

pub fn points_url(base_url: &str, latitude: f64, longitude: f64) -> String {
    format!("{}/points/{:.4},{:.4}", base_url, latitude, longitude)
}

/// Reads a field as `None` when it is `null` or not shaped like `T`, so one
/// odd field does not reject the whole payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A collection that may be `null` or malformed reads as empty.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    lenient(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertsResponse {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub features: Vec<AlertFeature>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertFeature {
    #[serde(default, deserialize_with = "lenient")]
    pub properties: Option<AlertProperties>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertProperties {
    #[serde(default, deserialize_with = "lenient")]
    pub event: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub area_desc: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub instruction: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PointsResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub properties: Option<PointsProperties>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PointsProperties {
    #[serde(default, deserialize_with = "lenient")]
    pub forecast: Option<String>,
}

impl PointsResponse {
    pub fn forecast_url(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.forecast.as_deref())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub properties: Option<ForecastProperties>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastProperties {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub periods: Vec<ForecastPeriod>,
}

impl ForecastResponse {
    pub fn periods(&self) -> &[ForecastPeriod] {
        self.properties
            .as_ref()
            .map(|p| p.periods.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Usually an integer, but kept loose so odd payloads still render.
    pub temperature: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub temperature_unit: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub wind_speed: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub wind_direction: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub short_forecast: Option<String>,
}

/// `value` unless it is absent or empty, otherwise `default`.
pub fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(default)
}
