//! Configuration module for the Xiuxian runtime.
//!
//! This module provides figment-based configuration loading and validation
//! for logging and rule matching settings.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, MatchingConfig, SpanEventConfig,
    XiuxianConfig,
};
pub use validation::validate_config;
