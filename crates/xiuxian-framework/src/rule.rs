//! Trigger rules.
//!
//! A [`Rule`] pairs one matching predicate with an opaque action reference.
//! The predicate is chosen by [`RuleKind`]:
//!
//! | kind            | matches when `raw_text` ...                              |
//! |-----------------|----------------------------------------------------------|
//! | `Prefix`        | starts with the pattern but is not equal to it           |
//! | `Suffix`        | ends with the pattern but is not equal to it             |
//! | `Keyword`       | contains the pattern                                     |
//! | `Fullmatch`     | equals the pattern                                       |
//! | `Command`       | starts with the pattern (equality included)              |
//! | `FileExtension` | is irrelevant; the attached file has this extension      |
//! | `Regex`         | contains a match of the pattern                          |
//!
//! A message equal to a prefix or suffix is left to `Fullmatch` rules, while
//! a bare command with no arguments still counts as a `Command`.
//!
//! # Example
//!
//! ```rust,ignore
//! use xiuxian_framework::{Rule, RuleKind};
//!
//! let help = Rule::command("/help", "help_handler").block(true).build()?;
//! let dice = Rule::regex(r"\d+d\d+", "dice_handler").to_me(true).build()?;
//! let any = Rule::new(RuleKind::Keyword, "bot", "log_handler")?;
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{RuleError, RuleResult};
use xiuxian_core::Event;

// ============================================================================
// Rule Kind
// ============================================================================

/// The predicate a rule applies to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Prefix,
    Suffix,
    Keyword,
    Fullmatch,
    Command,
    #[serde(rename = "file")]
    FileExtension,
    Regex,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prefix => "prefix",
            Self::Suffix => "suffix",
            Self::Keyword => "keyword",
            Self::Fullmatch => "fullmatch",
            Self::Command => "command",
            Self::FileExtension => "file",
            Self::Regex => "regex",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "prefix" => Self::Prefix,
            "suffix" => Self::Suffix,
            "keyword" => Self::Keyword,
            "fullmatch" => Self::Fullmatch,
            "command" => Self::Command,
            "file" | "file_extension" => Self::FileExtension,
            "regex" => Self::Regex,
            _ => return Err(RuleError::UnknownKind(s.to_string())),
        })
    }
}

// ============================================================================
// Regex Limits
// ============================================================================

/// Compile-time bounds for regex rules.
///
/// Matching with the `regex` crate runs in time linear in the input, so the
/// compiled program size is the only cost worth bounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegexLimits {
    /// Approximate upper bound, in bytes, of a compiled regex.
    pub size_limit: usize,
    /// Maximum nesting depth of the pattern.
    pub nest_limit: u32,
}

impl Default for RegexLimits {
    fn default() -> Self {
        Self {
            size_limit: 10 * (1 << 20),
            nest_limit: 250,
        }
    }
}

impl RegexLimits {
    fn compile(&self, pattern: &str) -> RuleResult<Regex> {
        RegexBuilder::new(pattern)
            .size_limit(self.size_limit)
            .nest_limit(self.nest_limit)
            .build()
            .map_err(|source| RuleError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }
}

// ============================================================================
// Rule Builder
// ============================================================================

/// Builder for [`Rule`].
///
/// Regex patterns are compiled in [`build`](Self::build), so a malformed
/// pattern is reported when the rule is registered rather than when an event
/// arrives.
pub struct RuleBuilder<A> {
    kind: RuleKind,
    pattern: String,
    action: A,
    block: bool,
    require_addressed: bool,
    name: Option<String>,
    limits: RegexLimits,
}

impl<A> RuleBuilder<A> {
    /// Stop evaluating later rules when this one matches.
    pub fn block(mut self, block: bool) -> Self {
        self.block = block;
        self
    }

    /// Only match events addressed to the bot.
    pub fn to_me(mut self, require_addressed: bool) -> Self {
        self.require_addressed = require_addressed;
        self
    }

    /// Sets a name for this rule (useful for debugging and removal).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Overrides the regex compile limits.
    pub fn limits(mut self, limits: RegexLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn build(self) -> RuleResult<Rule<A>> {
        let regex = match self.kind {
            RuleKind::Regex => Some(self.limits.compile(&self.pattern)?),
            _ => None,
        };

        Ok(Rule {
            inner: Arc::new(RuleInner {
                kind: self.kind,
                pattern: self.pattern,
                regex,
                action: self.action,
                block: self.block,
                require_addressed: self.require_addressed,
                name: self.name,
            }),
        })
    }
}

// ============================================================================
// Rule
// ============================================================================

struct RuleInner<A> {
    kind: RuleKind,
    pattern: String,
    /// Present exactly when `kind` is `Regex`.
    regex: Option<Regex>,
    action: A,
    block: bool,
    require_addressed: bool,
    name: Option<String>,
}

/// A matching predicate plus the action to run when it fires.
///
/// Rules are immutable once built. Cloning is cheap: the rule data lives
/// behind an `Arc`, and the action type `A` does not need to be `Clone`.
pub struct Rule<A> {
    inner: Arc<RuleInner<A>>,
}

impl<A> Clone for Rule<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> fmt::Debug for Rule<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("kind", &self.inner.kind)
            .field("pattern", &self.inner.pattern)
            .field("block", &self.inner.block)
            .field("require_addressed", &self.inner.require_addressed)
            .field("name", &self.inner.name)
            .finish_non_exhaustive()
    }
}

impl<A> Rule<A> {
    /// Starts building a rule of any kind.
    pub fn builder(kind: RuleKind, pattern: impl Into<String>, action: A) -> RuleBuilder<A> {
        RuleBuilder {
            kind,
            pattern: pattern.into(),
            action,
            block: false,
            require_addressed: false,
            name: None,
            limits: RegexLimits::default(),
        }
    }

    /// Builds a non-blocking rule with default settings.
    pub fn new(kind: RuleKind, pattern: impl Into<String>, action: A) -> RuleResult<Self> {
        Self::builder(kind, pattern, action).build()
    }

    pub fn prefix(pattern: impl Into<String>, action: A) -> RuleBuilder<A> {
        Self::builder(RuleKind::Prefix, pattern, action)
    }

    pub fn suffix(pattern: impl Into<String>, action: A) -> RuleBuilder<A> {
        Self::builder(RuleKind::Suffix, pattern, action)
    }

    pub fn keyword(pattern: impl Into<String>, action: A) -> RuleBuilder<A> {
        Self::builder(RuleKind::Keyword, pattern, action)
    }

    pub fn fullmatch(pattern: impl Into<String>, action: A) -> RuleBuilder<A> {
        Self::builder(RuleKind::Fullmatch, pattern, action)
    }

    pub fn command(pattern: impl Into<String>, action: A) -> RuleBuilder<A> {
        Self::builder(RuleKind::Command, pattern, action)
    }

    /// Matches attached files by extension, without the dot (`"zip"`).
    pub fn file(extension: impl Into<String>, action: A) -> RuleBuilder<A> {
        Self::builder(RuleKind::FileExtension, extension, action)
    }

    pub fn regex(pattern: impl Into<String>, action: A) -> RuleBuilder<A> {
        Self::builder(RuleKind::Regex, pattern, action)
    }

    pub fn kind(&self) -> RuleKind {
        self.inner.kind
    }

    pub fn pattern(&self) -> &str {
        &self.inner.pattern
    }

    pub fn action(&self) -> &A {
        &self.inner.action
    }

    pub fn is_blocking(&self) -> bool {
        self.inner.block
    }

    pub fn requires_addressed(&self) -> bool {
        self.inner.require_addressed
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// The name if set, the pattern otherwise.
    pub(crate) fn label(&self) -> &str {
        self.inner.name.as_deref().unwrap_or(&self.inner.pattern)
    }

    pub(crate) fn compiled(&self) -> Option<&Regex> {
        self.inner.regex.as_ref()
    }

    /// Checks whether this rule fires for `event`.
    ///
    /// A rule requiring addressing rejects events not addressed to the bot
    /// before its pattern is looked at.
    pub fn matches(&self, event: &Event) -> bool {
        if self.inner.require_addressed && !event.is_tome {
            return false;
        }

        let pattern = self.inner.pattern.as_str();
        let msg = event.raw_text.as_str();

        match self.inner.kind {
            RuleKind::Prefix => check_prefix(pattern, msg),
            RuleKind::Suffix => check_suffix(pattern, msg),
            RuleKind::Keyword => msg.contains(pattern),
            RuleKind::Fullmatch => msg == pattern,
            RuleKind::Command => msg.starts_with(pattern),
            RuleKind::FileExtension => check_file_extension(pattern, event),
            RuleKind::Regex => self.compiled().is_some_and(|re| re.is_match(msg)),
        }
    }
}

fn check_prefix(prefix: &str, msg: &str) -> bool {
    msg.starts_with(prefix) && msg != prefix
}

fn check_suffix(suffix: &str, msg: &str) -> bool {
    msg.ends_with(suffix) && msg != suffix
}

/// A name without a dot has no extension, and a missing or empty payload
/// never matches.
fn check_file_extension(extension: &str, event: &Event) -> bool {
    if event.file_payload().is_none() {
        return false;
    }

    event
        .file_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .is_some_and(|(_, ext)| ext == extension)
}
