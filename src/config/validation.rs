//! Configuration validation.

use crate::config::Config;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate the configuration.
///
/// Checks for:
/// - A known log level
/// - Absolute metrics and health paths
/// - Metrics and health paths that do not shadow each other or the root route
/// - A non-zero work modulus and a finite gauge offset
///
/// # Returns
///
/// `Ok(())` if valid, or an error message describing every problem found.
pub fn validate_config(config: &Config) -> Result<(), String> {
    let mut errors = Vec::new();

    let level = config.global.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(format!("unknown log level: {}", config.global.log_level));
    }

    let server = &config.server;
    for (name, path) in [
        ("metrics_path", &server.metrics_path),
        ("health_path", &server.health_path),
    ] {
        if !path.starts_with('/') {
            errors.push(format!("{} must start with '/': {}", name, path));
        } else if path == "/" {
            errors.push(format!("{} cannot be the root path", name));
        }
    }

    if server.metrics_path == server.health_path {
        errors.push(format!(
            "metrics_path and health_path are both '{}'",
            server.metrics_path
        ));
    }

    if config.work.modulus == 0 {
        errors.push("work.modulus must be greater than zero".to_string());
    }

    if !config.work.gauge_offset.is_finite() {
        errors.push("work.gauge_offset must be a finite number".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_unknown_log_level() {
        let mut config = Config::default();
        config.global.log_level = "loud".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.contains("unknown log level"));
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut config = Config::default();
        config.global.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_relative_path_rejected() {
        let mut config = Config::default();
        config.server.metrics_path = "metrics".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.contains("metrics_path must start with '/'"));
    }

    #[test]
    fn test_root_path_rejected() {
        let mut config = Config::default();
        config.server.health_path = "/".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.contains("health_path cannot be the root path"));
    }

    #[test]
    fn test_duplicate_paths_rejected() {
        let mut config = Config::default();
        config.server.health_path = "/metrics".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.contains("both '/metrics'"));
    }

    #[test]
    fn test_zero_modulus_rejected() {
        let mut config = Config::default();
        config.work.modulus = 0;
        config.work.gauge_offset = f64::NAN;
        let err = validate_config(&config).unwrap_err();
        assert!(err.contains("work.modulus"));
        assert!(err.contains("work.gauge_offset"));
    }
}
