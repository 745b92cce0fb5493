//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use xiuxian_framework::RegexLimits;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct XiuxianConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Rule matching settings.
    #[serde(default)]
    pub matching: MatchingConfig,
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    #[cfg(feature = "json-log")]
    Json,
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// How often the log file is rolled over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanEventConfig {
    pub new: bool,
    pub enter: bool,
    pub exit: bool,
    pub close: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global log level.
    pub level: LogLevel,

    /// Output format.
    pub format: LogFormat,

    /// Output destination.
    pub output: LogOutput,

    /// Span lifecycle events.
    pub span_events: SpanEventConfig,

    /// Include thread ids.
    pub thread_ids: bool,

    /// Include file names and line numbers.
    pub file_location: bool,

    /// Log file path, required when `output` is `file`.
    pub file_path: Option<PathBuf>,

    /// File rotation, only used with `output = "file"`.
    pub rotation: LogRotation,

    /// Per-module levels, e.g. `xiuxian_framework = "trace"`.
    pub filters: HashMap<String, LogLevel>,
}

// =============================================================================
// Matching
// =============================================================================

/// Rule matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Upper bound, in bytes, of a compiled regex rule.
    #[serde(default = "default_regex_size_limit")]
    pub regex_size_limit: usize,

    /// Maximum nesting depth of a regex rule.
    #[serde(default = "default_regex_nest_limit")]
    pub regex_nest_limit: u32,

    /// Maximum number of registered rules; unlimited when absent.
    #[serde(default)]
    pub max_rules: Option<usize>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            regex_size_limit: default_regex_size_limit(),
            regex_nest_limit: default_regex_nest_limit(),
            max_rules: None,
        }
    }
}

impl MatchingConfig {
    /// Converts to the compile limits used when building rules.
    pub fn regex_limits(&self) -> RegexLimits {
        RegexLimits {
            size_limit: self.regex_size_limit,
            nest_limit: self.regex_nest_limit,
        }
    }
}

fn default_regex_size_limit() -> usize {
    RegexLimits::default().size_limit
}

fn default_regex_nest_limit() -> u32 {
    RegexLimits::default().nest_limit
}
