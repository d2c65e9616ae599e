//! Server configuration read from the environment.

use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PASS_TURN_DELAY_MS: u64 = 2000;
const DEFAULT_ROOM_SWEEP_INTERVAL_SECS: u64 = 3600;
const DEFAULT_ROOM_MAX_AGE_SECS: i64 = 86_400;

/// Runtime settings for the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Pause before the turn passes after a roll without legal moves.
    pub pass_turn_delay: Duration,
    /// How often stale rooms are swept.
    pub room_sweep_interval: Duration,
    /// Rooms older than this are removed by the sweep.
    pub room_max_age: TimeDelta,
    /// OTLP collector endpoint. Span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl ServerConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let pass_turn_delay_ms = parse_or(&lookup, "PASS_TURN_DELAY_MS", DEFAULT_PASS_TURN_DELAY_MS)?;
        let sweep_secs = parse_or(
            &lookup,
            "ROOM_SWEEP_INTERVAL_SECS",
            DEFAULT_ROOM_SWEEP_INTERVAL_SECS,
        )?;
        if sweep_secs == 0 {
            return Err(AppError::Config(
                "ROOM_SWEEP_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }
        let max_age_secs = parse_or(&lookup, "ROOM_MAX_AGE_SECS", DEFAULT_ROOM_MAX_AGE_SECS)?;
        let room_max_age = TimeDelta::try_seconds(max_age_secs)
            .filter(|age| *age > TimeDelta::zero())
            .ok_or_else(|| {
                AppError::Config("ROOM_MAX_AGE_SECS must be a positive number of seconds".to_string())
            })?;
        let otlp_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.trim().is_empty());

        Ok(Self {
            host,
            port,
            pass_turn_delay: Duration::from_millis(pass_turn_delay_ms),
            room_sweep_interval: Duration::from_secs(sweep_secs),
            room_max_age,
            otlp_endpoint,
        })
    }

    /// `host:port` string to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.pass_turn_delay, Duration::from_millis(2000));
        assert_eq!(config.room_sweep_interval, Duration::from_secs(3600));
        assert_eq!(config.room_max_age, TimeDelta::hours(24));
        assert_eq!(config.otlp_endpoint, None);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_values_are_read_from_environment() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("PASS_TURN_DELAY_MS", "0"),
            ("ROOM_SWEEP_INTERVAL_SECS", "60"),
            ("ROOM_MAX_AGE_SECS", "120"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.pass_turn_delay, Duration::ZERO);
        assert_eq!(config.room_sweep_interval, Duration::from_secs(60));
        assert_eq!(config.room_max_age, TimeDelta::minutes(2));
        assert_eq!(
            config.otlp_endpoint.as_deref(),
            Some("http://collector:4317")
        );
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let err = config_from(&[("PORT", "not-a-port")]).unwrap_err();

        assert!(matches!(err, AppError::Config(ref msg) if msg.starts_with("PORT")));
    }

    #[test]
    fn test_zero_sweep_interval_is_rejected() {
        let err = config_from(&[("ROOM_SWEEP_INTERVAL_SECS", "0")]).unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_non_positive_max_age_is_rejected() {
        assert!(config_from(&[("ROOM_MAX_AGE_SECS", "0")]).is_err());
        assert!(config_from(&[("ROOM_MAX_AGE_SECS", "-5")]).is_err());
    }

    #[test]
    fn test_blank_otlp_endpoint_disables_export() {
        let config = config_from(&[("OTEL_EXPORTER_OTLP_ENDPOINT", "  ")]).unwrap();

        assert_eq!(config.otlp_endpoint, None);
    }
}
