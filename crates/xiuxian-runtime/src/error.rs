//! Runtime error types.

use thiserror::Error;
use xiuxian_framework::RuleError;

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A rule could not be built.
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// The router already holds `matching.max_rules` rules.
    #[error("Rule limit reached: at most {max} rules may be registered")]
    RuleLimitReached { max: usize },
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
