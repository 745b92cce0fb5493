//! A router that can change while events are being evaluated.
//!
//! [`SharedRouter`] stores the current [`Router`] behind an `Arc`. Readers
//! take a snapshot (one `Arc` clone under a read lock) and evaluate without
//! holding any lock. Writers copy the router, apply their change and swap
//! the new version in, so an evaluation always sees either the whole update
//! or none of it.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::router::{Matched, Router};
use crate::rule::Rule;
use xiuxian_core::Event;

/// Copy-on-write handle to a [`Router`].
///
/// Cloning the handle is cheap; all clones see the same router.
pub struct SharedRouter<A> {
    current: Arc<RwLock<Arc<Router<A>>>>,
}

impl<A> Clone for SharedRouter<A> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
        }
    }
}

impl<A> Default for SharedRouter<A> {
    fn default() -> Self {
        Self::new(Router::new())
    }
}

impl<A> From<Router<A>> for SharedRouter<A> {
    fn from(router: Router<A>) -> Self {
        Self::new(router)
    }
}

impl<A> SharedRouter<A> {
    pub fn new(router: Router<A>) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(router))),
        }
    }

    /// Returns the router as it is right now.
    ///
    /// Later updates do not affect the returned snapshot.
    pub fn snapshot(&self) -> Arc<Router<A>> {
        Arc::clone(&self.current.read())
    }

    /// Applies `f` to a copy of the router and publishes the result.
    ///
    /// Writers are serialized; readers keep using the previous version until
    /// the swap.
    pub fn update<R>(&self, f: impl FnOnce(&mut Router<A>) -> R) -> R {
        let mut guard = self.current.write();
        let mut next = Router::clone(&guard);
        let result = f(&mut next);
        debug!(rule_count = next.len(), "Publishing updated router");
        *guard = Arc::new(next);
        result
    }

    /// Appends a rule.
    pub fn register(&self, rule: Rule<A>) {
        self.update(|router| router.add(rule));
    }

    /// Replaces the whole router.
    pub fn replace(&self, router: Router<A>) {
        *self.current.write() = Arc::new(router);
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    /// Evaluates `event` against the current snapshot.
    pub fn evaluate(&self, event: &Event) -> Vec<Matched<A>> {
        self.snapshot().evaluate(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event(raw_text: &str) -> Event {
        Event::default().with_raw_text(raw_text)
    }

    #[test]
    fn test_snapshot_is_isolated_from_updates() {
        let shared = SharedRouter::new(
            Router::new().with(Rule::keyword("hi", "greet").build().unwrap()),
        );

        let before = shared.snapshot();
        shared.register(Rule::keyword("hi", "log").build().unwrap());

        assert_eq!(before.evaluate(&event("hi")).len(), 1);
        assert_eq!(shared.evaluate(&event("hi")).len(), 2);
        assert_eq!(shared.len(), 2);
    }

    #[test]
    fn test_update_returns_closure_result() {
        let shared: SharedRouter<&str> = SharedRouter::default();
        shared.register(Rule::keyword("a", "x").name("tmp").build().unwrap());
        shared.register(Rule::keyword("b", "y").build().unwrap());

        let removed = shared.update(|router| router.remove_named("tmp"));

        assert_eq!(removed, 1);
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn test_replace() {
        let shared: SharedRouter<&str> = SharedRouter::default();
        assert!(shared.is_empty());

        shared.replace(Router::new().with(Rule::fullmatch("ping", "pong").build().unwrap()));

        let matches = shared.evaluate(&event("ping"));
        assert_eq!(*matches[0].action(), "pong");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_evaluation_during_updates() {
        let shared = SharedRouter::new(
            Router::new().with(Rule::command("/roll", 0usize).build().unwrap()),
        );
        let seen = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for i in 0..16 {
            let shared = shared.clone();
            let seen = Arc::clone(&seen);
            tasks.push(tokio::spawn(async move {
                let input = event(&format!("/roll {i}"));
                let matches = shared.evaluate(&input);
                // The first rule is never removed, so it always matches.
                assert_eq!(*matches[0].action(), 0);
                assert_eq!(matches[0].event.text, format!(" {i}"));
                for m in &matches {
                    assert_eq!(m.event.raw_text, input.raw_text);
                }
                seen.fetch_add(1, Ordering::SeqCst);
            }));
        }

        for i in 1..=8 {
            shared.register(Rule::keyword("roll", i).build().unwrap());
        }

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(seen.load(Ordering::SeqCst), 16);
        assert_eq!(shared.len(), 9);
        assert_eq!(shared.evaluate(&event("/roll 1")).len(), 9);
    }
}
