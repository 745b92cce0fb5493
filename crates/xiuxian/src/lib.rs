//! # Xiuxian
//!
//! Trigger-based routing of inbound chat messages.
//!
//! ## Overview
//!
//! An adapter normalizes a received message into an [`Event`](core::Event).
//! The [`Router`](framework::Router) checks it against an ordered list of
//! rules and returns every rule that fired, each with its own copy of the
//! event carrying the extracted `command` and `text`. A blocking rule stops
//! evaluation after it matches.
//!
//! ```text
//! ┌────────────────┐     ┌───────┐     ┌────────┐     ┌─────────────────┐
//! │ MessageReceive │────▶│ Event │────▶│ Router │────▶│ Vec<Matched<A>> │
//! └────────────────┘     └───────┘     └────────┘     └─────────────────┘
//! ```
//!
//! - **Core**: message content, events and outgoing messages
//! - **Framework**: rules, extraction and routers
//! - **Runtime**: configuration, logging and the shared router
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use xiuxian::prelude::*;
//!
//! let runtime: XiuxianRuntime<&str> = XiuxianRuntime::new();
//! runtime.register(Rule::command("/roll", "roll").block(true).build()?)?;
//!
//! let event = Event::from_receive(receive).to_me(true);
//! for matched in runtime.evaluate(&event) {
//!     println!("{} {}", matched.action(), matched.event.text);
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: Load `xiuxian.toml` configuration files (default)
//! - `yaml-config`: Load `xiuxian.yaml` configuration files
//! - `json-log`: Enable JSON log output

pub use xiuxian_core as core;
pub use xiuxian_framework as framework;
pub use xiuxian_runtime as runtime;
pub use xiuxian_runtime::tracing;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use xiuxian::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use xiuxian_runtime::{RuntimeError, RuntimeResult, XiuxianRuntime};

    // Rules and routing
    pub use xiuxian_framework::{
        Matched, RegexLimits, Router, Rule, RuleError, RuleKind, SharedRouter,
    };

    // Messages
    pub use xiuxian_core::{Content, Event, MediaSource, MessageReceive, MessageSend, SourceKind};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_routes_event() {
        let router = Router::new()
            .with(Rule::command("/ping", "pong").block(true).build().unwrap())
            .with(Rule::keyword("ping", "log").build().unwrap());

        let event = Event::default().with_raw_text("/ping now");
        let matched = router.evaluate(&event);

        crate::tracing::debug!(count = matched.len(), "Routed through the facade");
        assert_eq!(matched.len(), 1);
        assert_eq!(*matched[0].action(), "pong");
        assert_eq!(matched[0].event.text, " now");
    }
}
