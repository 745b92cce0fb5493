//! Xiuxian Runtime - configuration, logging and rule ownership.
//!
//! This crate provides:
//! - figment-based configuration (`XiuxianConfig`, `ConfigLoader`)
//! - Logging setup over `tracing-subscriber` (`LoggingBuilder`)
//! - `XiuxianRuntime`, which owns a `SharedRouter` and builds rules with the
//!   configured regex limits
//!
//! ```ignore
//! use xiuxian_runtime::XiuxianRuntime;
//! use xiuxian_framework::RuleKind;
//!
//! let runtime: XiuxianRuntime<&str> = XiuxianRuntime::new();
//! runtime.register(runtime.rule(RuleKind::Prefix, "hi", "greet")?)?;
//! let matched = runtime.evaluate(&event);
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{ConfigError, ConfigLoader, ConfigResult, MatchingConfig, XiuxianConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{RuntimeBuilder, XiuxianRuntime};

// Re-export tracing so applications can log without depending on it directly
pub use tracing;
