//! Configuration data types.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub global: GlobalConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Simulated work settings for the root route
    #[serde(default)]
    pub work: WorkConfig,
}

/// Global configuration settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlobalConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Json,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address and port to listen on
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Path serving the metrics exposition
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,

    /// Path serving the health check
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            metrics_path: default_metrics_path(),
            health_path: default_health_path(),
        }
    }
}

/// Parameters of the simulated work performed on the root route.
///
/// The delay is `(content_length % modulus) * unit` and the work gauge is
/// `path.len() + gauge_offset`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkConfig {
    #[serde(default = "default_modulus")]
    pub modulus: u64,

    #[serde(default = "default_unit", with = "humantime_serde")]
    pub unit: Duration,

    #[serde(default = "default_gauge_offset")]
    pub gauge_offset: f64,
}

impl Default for WorkConfig {
    fn default() -> Self {
        Self {
            modulus: default_modulus(),
            unit: default_unit(),
            gauge_offset: default_gauge_offset(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Json
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_health_path() -> String {
    "/health".to_string()
}

fn default_modulus() -> u64 {
    100
}

fn default_unit() -> Duration {
    Duration::from_millis(1)
}

fn default_gauge_offset() -> f64 {
    10.0
}

/// Durations written the humantime way ("1ms", "2s 500ms").
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::Duration::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<humantime::Duration>()
            .map(Duration::from)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.global.log_level, "info");
        assert_eq!(config.server.listen.port(), 8080);
        assert_eq!(config.server.metrics_path, "/metrics");
        assert_eq!(config.server.health_path, "/health");
        assert_eq!(config.work.modulus, 100);
        assert_eq!(config.work.unit, Duration::from_millis(1));
        assert_eq!(config.work.gauge_offset, 10.0);
    }

    #[test]
    fn test_log_format_serde() {
        let format: LogFormat = serde_yaml::from_str("pretty").unwrap();
        assert_eq!(format, LogFormat::Pretty);

        let format: LogFormat = serde_yaml::from_str("json").unwrap();
        assert_eq!(format, LogFormat::Json);
    }

    #[test]
    fn test_work_unit_humantime() {
        let work: WorkConfig = serde_yaml::from_str("unit: 2ms").unwrap();
        assert_eq!(work.unit, Duration::from_millis(2));
        assert_eq!(work.modulus, 100);
    }

    #[test]
    fn test_work_unit_invalid() {
        let result: Result<WorkConfig, _> = serde_yaml::from_str("unit: soon");
        assert!(result.is_err());
    }
}
