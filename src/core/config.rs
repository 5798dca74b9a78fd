/// Server Configuration
///
/// Everything is read from environment variables with defaults, so a server
/// can be launched by an MCP client without any command-line arguments.
///
/// Environment Variables:
/// - SERVER_NAME / SERVER_VERSION: identity reported from `initialize`
/// - MCP_TRANSPORT_MODE: "stdio", "http", or "both" (default: "stdio")
/// - HOST / PORT: bind address for HTTP mode (default: 0.0.0.0:3000)
/// - WORKER_THREADS: HTTP worker count (default: CPU count, max 16)
/// - NWS_API_BASE: weather API base URL (default: https://api.weather.gov)
/// - NWS_TIMEOUT_SECS: optional timeout for weather API requests

use std::str::FromStr;
use std::time::Duration;

use crate::core::error::ServerError;
use crate::core::protocol::ServerInfo;

pub const DEFAULT_NWS_API_BASE: &str = "https://api.weather.gov";

/// Which transports to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Stdio,
    Http,
    Both,
}

impl FromStr for TransportMode {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdio" => Ok(TransportMode::Stdio),
            "http" => Ok(TransportMode::Http),
            "both" => Ok(TransportMode::Both),
            other => Err(ServerError::Config(format!(
                "invalid transport mode '{}', must be 'stdio', 'http', or 'both'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub info: ServerInfo,
    pub transport: TransportMode,
    pub http: HttpConfig,
    pub nws_api_base: String,
    /// `None` leaves the HTTP client without a request timeout.
    pub nws_timeout: Option<Duration>,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env(default_name: &str, default_version: &str) -> Result<Self, ServerError> {
        Self::from_lookup(default_name, default_version, |key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(default_name: &str, default_version: &str, lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let transport = get("MCP_TRANSPORT_MODE", "stdio").parse()?;

        // Unparseable ports fall back to the default rather than aborting
        let port = lookup("PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let workers = lookup("WORKER_THREADS")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or_else(|| num_cpus::get().clamp(1, 16));

        let nws_timeout = match lookup("NWS_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| {
                    ServerError::Config(format!("NWS_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            info: ServerInfo {
                name: get("SERVER_NAME", default_name),
                version: get("SERVER_VERSION", default_version),
            },
            transport,
            http: HttpConfig {
                host: get("HOST", "0.0.0.0"),
                port,
                workers,
            },
            nws_api_base: get("NWS_API_BASE", DEFAULT_NWS_API_BASE),
            nws_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ServerError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup("test-server", "9.9.9", |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.info.name, "test-server");
        assert_eq!(config.info.version, "9.9.9");
        assert_eq!(config.transport, TransportMode::Stdio);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 3000);
        assert!(config.http.workers >= 1 && config.http.workers <= 16);
        assert_eq!(config.nws_api_base, DEFAULT_NWS_API_BASE);
        assert_eq!(config.nws_timeout, None);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = load(&[
            ("SERVER_NAME", "custom"),
            ("MCP_TRANSPORT_MODE", "both"),
            ("PORT", "8080"),
            ("WORKER_THREADS", "3"),
            ("NWS_API_BASE", "http://localhost:9000"),
            ("NWS_TIMEOUT_SECS", "15"),
        ])
        .unwrap();
        assert_eq!(config.info.name, "custom");
        assert_eq!(config.transport, TransportMode::Both);
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.workers, 3);
        assert_eq!(config.nws_api_base, "http://localhost:9000");
        assert_eq!(config.nws_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn bad_port_falls_back() {
        let config = load(&[("PORT", "not-a-port")]).unwrap();
        assert_eq!(config.http.port, 3000);
    }

    #[test]
    fn invalid_transport_is_a_startup_error() {
        let err = load(&[("MCP_TRANSPORT_MODE", "carrier-pigeon")]).unwrap_err();
        assert!(matches!(err, ServerError::Config(msg) if msg.contains("carrier-pigeon")));
    }

    #[test]
    fn invalid_timeout_is_a_startup_error() {
        assert!(load(&[("NWS_TIMEOUT_SECS", "soon")]).is_err());
    }
}
