//! Configuration management for the LTP service.
//!
//! This module handles loading and validating configuration from environment variables.
//! Every setting is optional; the defaults encode the refresh policy the service
//! was designed around (30s ticks, 60s staleness, 3 attempts, 100ms backoff base).

use crate::error::{ConfigError, ConfigResult};
use crate::refresh::RetryPolicy;
use std::env;
use std::time::Duration;

/// Default upstream ticker API root.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.kraken.com/0/public";

/// Upper bound for `MAX_RETRIES`.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Upper bound for `BACKOFF_BASE_MS` and `BACKOFF_JITTER_MS`.
pub const MAX_BACKOFF_MS: u64 = 60_000;

/// Configuration for the LTP service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream ticker API base URL
    pub upstream_base_url: String,

    /// Address the HTTP server binds to (default: "0.0.0.0:8080")
    pub listen_addr: String,

    /// Periodic refresh interval in seconds (default: 30)
    pub refresh_interval_secs: u64,

    /// Age in seconds after which a read triggers a background refresh (default: 60)
    pub staleness_threshold_secs: u64,

    /// Attempts per upstream request, first try included (default: 3)
    pub max_retries: u32,

    /// Exponential backoff base in milliseconds (default: 100)
    pub backoff_base_ms: u64,

    /// Upper bound of the random jitter added to each backoff, in milliseconds (default: 100)
    pub backoff_jitter_ms: u64,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Log level (default: "info")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `UPSTREAM_BASE_URL`: Ticker API root (default: Kraken public API)
    /// - `LISTEN_ADDR`: HTTP bind address (default: 0.0.0.0:8080)
    /// - `REFRESH_INTERVAL_SECS`: Periodic refresh interval (default: 30)
    /// - `STALENESS_THRESHOLD_SECS`: Read-triggered refresh threshold (default: 60)
    /// - `MAX_RETRIES`: Attempts per upstream request (default: 3)
    /// - `BACKOFF_BASE_MS`: Backoff base (default: 100)
    /// - `BACKOFF_JITTER_MS`: Backoff jitter bound (default: 100)
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    pub fn from_env() -> ConfigResult<Self> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();

        let defaults = Config::default();

        let upstream_base_url =
            env::var("UPSTREAM_BASE_URL").unwrap_or(defaults.upstream_base_url);
        if !upstream_base_url.starts_with("http://") && !upstream_base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                var: "UPSTREAM_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let listen_addr = env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr);
        if listen_addr.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "LISTEN_ADDR".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        let refresh_interval_secs =
            Self::parse_env_u64("REFRESH_INTERVAL_SECS", defaults.refresh_interval_secs)?;
        if refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: "REFRESH_INTERVAL_SECS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        let staleness_threshold_secs =
            Self::parse_env_u64("STALENESS_THRESHOLD_SECS", defaults.staleness_threshold_secs)?;

        let max_retries = Self::parse_env_u32("MAX_RETRIES", defaults.max_retries)?;
        if max_retries == 0 || max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::InvalidValue {
                var: "MAX_RETRIES".to_string(),
                reason: format!("Must be between 1 and {}", MAX_RETRIES_LIMIT),
            });
        }

        let backoff_base_ms = Self::parse_env_u64("BACKOFF_BASE_MS", defaults.backoff_base_ms)?;
        Self::check_backoff_ms("BACKOFF_BASE_MS", backoff_base_ms)?;
        let backoff_jitter_ms =
            Self::parse_env_u64("BACKOFF_JITTER_MS", defaults.backoff_jitter_ms)?;
        Self::check_backoff_ms("BACKOFF_JITTER_MS", backoff_jitter_ms)?;

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", defaults.request_timeout)?;
        if request_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                var: "REQUEST_TIMEOUT".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Config {
            upstream_base_url,
            listen_addr,
            refresh_interval_secs,
            staleness_threshold_secs,
            max_retries,
            backoff_base_ms,
            backoff_jitter_ms,
            request_timeout,
            log_level,
        })
    }

    /// Retry policy for upstream calls derived from this configuration.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.backoff_base_ms),
            Duration::from_millis(self.backoff_jitter_ms),
        )
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn staleness_threshold(&self) -> Duration {
        Duration::from_secs(self.staleness_threshold_secs)
    }

    fn check_backoff_ms(var_name: &str, value: u64) -> ConfigResult<()> {
        if value > MAX_BACKOFF_MS {
            return Err(ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be at most {}", MAX_BACKOFF_MS),
            });
        }
        Ok(())
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as u32 with a default value.
    fn parse_env_u32(var_name: &str, default: u32) -> ConfigResult<u32> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u32>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            listen_addr: "0.0.0.0:8080".to_string(),
            refresh_interval_secs: 30,
            staleness_threshold_secs: 60,
            max_retries: 3,
            backoff_base_ms: 100,
            backoff_jitter_ms: 100,
            request_timeout: 10,
            log_level: "info".to_string(),
        }
    }
}
