//! Ordered, block-aware rule evaluation.
//!
//! The [`Router`] keeps rules in registration order. When an event is
//! evaluated:
//!
//! 1. Rules are checked in registration order
//! 2. Each matching rule gets its own copy of the event with `command` and
//!    `text` extracted
//! 3. If a blocking rule matched, evaluation stops
//!
//! ```rust,ignore
//! use xiuxian_framework::{Router, Rule};
//!
//! let router = Router::new()
//!     .with(Rule::keyword("", Action::Log).build()?)
//!     .with(Rule::command("/help", Action::Help).block(true).build()?)
//!     .with(Rule::prefix("/", Action::Unknown).build()?);
//!
//! for matched in router.evaluate(&event) {
//!     dispatcher.run(matched.action(), matched.event).await;
//! }
//! ```
//!
//! # Tower Service Integration
//!
//! `Router` implements `tower::Service<Event>`, so a deadline or other
//! middleware can wrap a whole evaluation:
//!
//! ```rust,ignore
//! use tower::{ServiceBuilder, ServiceExt};
//!
//! let matches = ServiceBuilder::new()
//!     .service(router)
//!     .oneshot(event)
//!     .await?;
//! ```

use std::convert::Infallible;
use std::fmt;
use std::task::{Context, Poll};

use futures::future::{Ready, ready};
use tower::Service;
use tracing::{Level, debug, span, trace};

use crate::error::RuleResult;
use crate::rule::{Rule, RuleKind};
use xiuxian_core::Event;

/// A rule that fired, together with the event as it extracted it.
pub struct Matched<A> {
    pub rule: Rule<A>,
    pub event: Event,
}

impl<A> Matched<A> {
    /// The action associated with the matching rule.
    pub fn action(&self) -> &A {
        self.rule.action()
    }
}

impl<A> Clone for Matched<A> {
    fn clone(&self) -> Self {
        Self {
            rule: self.rule.clone(),
            event: self.event.clone(),
        }
    }
}

impl<A> fmt::Debug for Matched<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matched")
            .field("rule", &self.rule)
            .field("command", &self.event.command)
            .field("text", &self.event.text)
            .finish()
    }
}

/// An ordered collection of rules.
///
/// # Thread Safety
///
/// Evaluation takes `&self` and never mutates rules, so a `Router` can be
/// shared across threads and evaluated concurrently. For runtime updates
/// use [`SharedRouter`](crate::SharedRouter).
pub struct Router<A> {
    rules: Vec<Rule<A>>,
}

impl<A> Default for Router<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for Router<A> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<A> Router<A> {
    /// Creates an empty router.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a rule. Rules are evaluated in the order they are added.
    pub fn add(&mut self, rule: Rule<A>) {
        self.rules.push(rule);
    }

    /// Adds a rule (builder pattern).
    pub fn with(mut self, rule: Rule<A>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Builds and adds a non-blocking rule.
    ///
    /// Fails without changing the router if the pattern does not compile.
    pub fn try_add(
        &mut self,
        kind: RuleKind,
        pattern: impl Into<String>,
        action: A,
    ) -> RuleResult<()> {
        self.rules.push(Rule::new(kind, pattern, action)?);
        Ok(())
    }

    /// Removes every rule with the given name, returning how many were removed.
    pub fn remove_named(&mut self, name: &str) -> usize {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.name() != Some(name));
        before - self.rules.len()
    }

    pub fn rules(&self) -> &[Rule<A>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Removes all rules.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Evaluates `event` against every rule in order.
    ///
    /// Returns the matching rules in order, each with a private copy of the
    /// event carrying that rule's `command` and `text`. The input event is
    /// not modified. An empty result means nothing matched.
    pub fn evaluate(&self, event: &Event) -> Vec<Matched<A>> {
        let span = span!(Level::DEBUG, "evaluate", msg_id = %event.msg_id);
        let _enter = span.enter();

        let mut matches = Vec::new();

        for (index, rule) in self.rules.iter().enumerate() {
            if !rule.matches(event) {
                trace!(rule = rule.label(), kind = %rule.kind(), index, "Rule did not match");
                continue;
            }

            let extracted = rule.extracted(event);
            debug!(
                rule = rule.label(),
                kind = %rule.kind(),
                index,
                command = %extracted.command,
                "Rule matched"
            );

            matches.push(Matched {
                rule: rule.clone(),
                event: extracted,
            });

            if rule.is_blocking() {
                debug!(rule = rule.label(), "Blocking rule matched, stopping evaluation");
                break;
            }
        }

        matches
    }
}

impl<A> fmt::Debug for Router<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("rule_count", &self.rules.len())
            .finish()
    }
}

// ============================================================================
// Tower Service Implementation for Router
// ============================================================================

impl<A> Service<Event> for Router<A> {
    type Response = Vec<Matched<A>>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, event: Event) -> Self::Future {
        ready(Ok(self.evaluate(&event)))
    }
}
