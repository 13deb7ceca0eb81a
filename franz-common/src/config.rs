//! Environment-based configuration
//!
//! The broker has no command-line flags; everything comes from `KAFKA_HOST`,
//! `KAFKA_PORT` and `LOG_LEVEL`, with broker-conventional defaults.

use std::env;

use thiserror::Error;
use tracing::Level;

pub const ENV_HOST: &str = "KAFKA_HOST";
pub const ENV_PORT: &str = "KAFKA_PORT";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 9092;

/// Configuration failures; these make the process exit nonzero.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid KAFKA_PORT value: {0}")]
    InvalidPort(String),

    #[error("invalid LOG_LEVEL value: {0}")]
    InvalidLogLevel(String),
}

/// Runtime configuration for the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var(ENV_HOST).unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = match env::var(ENV_PORT) {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let log_level = match env::var(ENV_LOG_LEVEL) {
            Ok(raw) => parse_level(&raw).ok_or(ConfigError::InvalidLogLevel(raw))?,
            Err(_) => Level::INFO,
        };

        Ok(Self {
            host,
            port,
            log_level,
        })
    }

    /// The full listen address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_level(raw: &str) -> Option<Level> {
    match raw.to_ascii_lowercase().as_str() {
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" | "err" => Some(Level::ERROR),
        _ => None,
    }
}
