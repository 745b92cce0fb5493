//! Error types for rule construction.

use thiserror::Error;

/// Errors reported when a rule is built.
///
/// Evaluation itself never fails: a rule that was built successfully can
/// always be checked against any event.
#[derive(Debug, Clone, Error)]
pub enum RuleError {
    /// The regular expression failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as supplied.
        pattern: String,
        /// The compile error.
        #[source]
        source: regex::Error,
    },

    /// The rule kind name is not recognised.
    #[error("unknown rule kind '{0}'")]
    UnknownKind(String),
}

/// Result type for rule construction.
pub type RuleResult<T> = Result<T, RuleError>;
