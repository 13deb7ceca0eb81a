//! Configuration and logging shared across the franz broker.

#![forbid(unsafe_code)]

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError};
pub use logging::init_logging;
