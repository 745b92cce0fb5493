//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogOutput, LoggingConfig, MatchingConfig, XiuxianConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &XiuxianConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_matching_config(&config.matching)?;
    Ok(())
}

/// Validates logging configuration.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.file_path is required when logging.output is 'file'",
        ));
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Invalid log filter module name: '{module}'"
        )));
    }

    Ok(())
}

/// Validates rule matching configuration.
fn validate_matching_config(matching: &MatchingConfig) -> ConfigResult<()> {
    if matching.regex_size_limit == 0 {
        return Err(ConfigError::validation(
            "matching.regex_size_limit must be greater than 0",
        ));
    }

    if matching.regex_nest_limit == 0 {
        return Err(ConfigError::validation(
            "matching.regex_nest_limit must be greater than 0",
        ));
    }

    if matching.max_rules == Some(0) {
        return Err(ConfigError::validation(
            "matching.max_rules must be greater than 0 when set",
        ));
    }

    Ok(())
}
