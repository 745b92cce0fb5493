//! # Xiuxian Framework
//!
//! The trigger matching engine.
//!
//! This layer provides:
//! - [`Rule`]: a prefix/suffix/keyword/fullmatch/command/file/regex predicate
//!   with an action reference, a block flag and an addressed-to-me gate
//! - Command/text extraction performed once a rule matches
//! - [`Router`]: ordered, block-aware evaluation of rules against an event
//! - [`SharedRouter`]: copy-on-write router for registration at runtime
//!
//! ```text
//! ┌─────────┐     ┌────────────────────────────┐     ┌────────────────────┐
//! │  Event  │────▶│ Router                     │────▶│ (Rule, Event) ...  │──▶ dispatcher
//! └─────────┘     │ rule 1 ─ rule 2 ─ [block]  │     └────────────────────┘
//!                 └────────────────────────────┘
//! ```
//!
//! How actions are invoked is left to the caller; the router only reports
//! which rules fired and what each of them extracted.

pub mod error;
pub mod extract;
pub mod router;
pub mod rule;
pub mod shared;

pub use error::{RuleError, RuleResult};
pub use extract::JOIN_SEPARATOR;
pub use router::{Matched, Router};
pub use rule::{RegexLimits, Rule, RuleBuilder, RuleKind};
pub use shared::SharedRouter;
