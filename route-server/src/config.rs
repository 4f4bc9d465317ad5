//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::delay::{PredictionCacheConfig, PredictionClientConfig};
use crate::fallback::FallbackConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_CSV_PATH: &str = "isl_wise_train_detail_03082015_v1.csv";

/// Error for an environment variable that is set but unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {key}={value:?}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,

    /// SQLite URL for the primary store. Without one, every search is
    /// served from the fallback index.
    pub database_url: Option<String>,

    /// Timetable CSV for the fallback index.
    pub csv_path: PathBuf,

    pub fallback: FallbackConfig,
    pub prediction: PredictionClientConfig,
    pub prediction_cache: PredictionCacheConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 5000))),
            database_url: None,
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            fallback: FallbackConfig::default(),
            prediction: PredictionClientConfig::default(),
            prediction_cache: PredictionCacheConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// Recognized variables: `BIND_ADDR`, `DATABASE_URL`, `TRAIN_CSV_PATH`,
    /// `FALLBACK_LOAD_TIMEOUT_SECS`, `ML_SERVICE_URL`,
    /// `PREDICTION_TIMEOUT_SECS`. Unset or blank variables keep their
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("BIND_ADDR") {
            config.bind_addr = value.trim().parse().map_err(|e: std::net::AddrParseError| {
                ConfigError {
                    key: "BIND_ADDR",
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        config.database_url = get("DATABASE_URL");

        if let Some(value) = get("TRAIN_CSV_PATH") {
            config.csv_path = PathBuf::from(value);
        }

        if let Some(value) = get("FALLBACK_LOAD_TIMEOUT_SECS") {
            let secs = parse_secs("FALLBACK_LOAD_TIMEOUT_SECS", &value)?;
            config.fallback = config
                .fallback
                .with_load_timeout(Duration::from_secs(secs));
        }

        if let Some(value) = get("ML_SERVICE_URL") {
            config.prediction = config.prediction.with_base_url(value.trim());
        }

        if let Some(value) = get("PREDICTION_TIMEOUT_SECS") {
            let secs = parse_secs("PREDICTION_TIMEOUT_SECS", &value)?;
            config.prediction = config.prediction.with_timeout_secs(secs);
        }

        Ok(config)
    }
}

/// Parse a positive whole number of seconds.
fn parse_secs(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    let error = |reason: &str| ConfigError {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    };

    match value.trim().parse::<u64>() {
        Ok(0) => Err(error("must be greater than zero")),
        Ok(secs) => Ok(secs),
        Err(_) => Err(error("expected a whole number of seconds")),
    }
}
