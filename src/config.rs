//! # Status Service Configuration
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! [publisher]
//! capacity = 64
//! strict = true
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Every field is optional; missing fields take the defaults below.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StatusConfig {
    #[serde(default)]
    pub publisher: PublisherConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublisherConfig {
    /// Snapshots buffered per subscriber before a slow one starts lagging.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Reject snapshots carrying error details without an active error.
    #[serde(default)]
    pub strict: bool,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level() }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> Result<tracing::Level, ConfigError> {
        self.level
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("unknown log level '{}'", self.level)))
    }
}

impl StatusConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.publisher.capacity == 0 {
            return Err(ConfigError::Invalid("publisher capacity must be > 0".to_string()));
        }
        self.logging.max_level()?;
        Ok(())
    }
}

fn default_capacity() -> usize { 16 }
fn default_level() -> String { "info".to_string() }

pub fn load_config(path: &str) -> Result<StatusConfig, ConfigError> {
    let config: StatusConfig = match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to parse config TOML: {}", e);
                return Err(ConfigError::Toml(e));
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path, e);
            return Err(ConfigError::Io(e));
        }
    };
    config.validate()?;
    Ok(config)
}
