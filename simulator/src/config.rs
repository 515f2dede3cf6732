use serde::{Deserialize, Serialize};
use std::{path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;
use tracing::Level;

use casino_church_types::casino::{DECAY_INTERVAL_MS, MEMECOIN_TICK_INTERVAL_MS};

/// Configuration for the [crate::Simulator] server.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory for the persisted progress record. Memory only when unset.
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_decay_interval_ms")]
    pub decay_interval_ms: u64,
    #[serde(default = "default_price_interval_ms")]
    pub price_interval_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
}

pub struct ValidatedConfig {
    pub port: u16,
    pub directory: Option<PathBuf>,
    pub log_level: Level,
    pub seed: u64,
    pub decay_interval: Duration,
    pub price_interval: Duration,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_decay_interval_ms() -> u64 {
    DECAY_INTERVAL_MS
}

fn default_price_interval_ms() -> u64 {
    MEMECOIN_TICK_INTERVAL_MS
}

fn non_zero(field: &'static str, value: u64) -> Result<Duration, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidNonZero { field, value });
    }
    Ok(Duration::from_millis(value))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            directory: None,
            log_level: default_log_level(),
            seed: 0,
            decay_interval_ms: default_decay_interval_ms(),
            price_interval_ms: default_price_interval_ms(),
        }
    }
}

impl Config {
    /// Read a YAML config file. Missing keys take their defaults.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;
        let decay_interval = non_zero("decay_interval_ms", self.decay_interval_ms)?;
        let price_interval = non_zero("price_interval_ms", self.price_interval_ms)?;

        Ok(ValidatedConfig {
            port: self.port,
            directory: self.directory.map(PathBuf::from),
            log_level,
            seed: self.seed,
            decay_interval,
            price_interval,
        })
    }
}
