//! Runtime that owns configuration, logging and the shared router.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use xiuxian_runtime::XiuxianRuntime;
//! use xiuxian_framework::RuleKind;
//!
//! // Auto-loads xiuxian.toml from the current or user config directory
//! let runtime: XiuxianRuntime<&str> = XiuxianRuntime::new();
//! runtime.register(runtime.rule(RuleKind::Command, "/help", "help")?)?;
//!
//! for matched in runtime.evaluate(&event) {
//!     println!("{} -> {}", matched.action(), matched.event.command);
//! }
//! ```

use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use xiuxian_core::Event;
use xiuxian_framework::{Matched, RegexLimits, Router, Rule, RuleBuilder, RuleKind, SharedRouter};

use crate::config::{ConfigLoader, XiuxianConfig, validate_config};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// The main Xiuxian runtime.
///
/// Rules built through [`XiuxianRuntime::rule`] are compiled with the
/// configured regex limits, and [`XiuxianRuntime::register`] enforces
/// `matching.max_rules`. Clones share the same router.
///
/// ```rust,ignore
/// let runtime: XiuxianRuntime<Action> = XiuxianRuntime::builder()
///     .config_file("config/xiuxian.toml")
///     .profile("production")
///     .build()?;
/// ```
pub struct XiuxianRuntime<A> {
    config: Arc<XiuxianConfig>,
    router: SharedRouter<A>,
}

impl<A> Clone for XiuxianRuntime<A> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            router: self.router.clone(),
        }
    }
}

impl<A> Default for XiuxianRuntime<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> XiuxianRuntime<A> {
    /// Creates a new runtime with automatic configuration loading.
    ///
    /// Falls back to default settings if no valid configuration is found.
    pub fn new() -> Self {
        let loaded = ConfigLoader::new()
            .with_current_dir()
            .with_user_config_dir()
            .load()
            .and_then(|config| validate_config(&config).map(|()| config));

        match loaded {
            Ok(config) => Self::from_config(&config),
            Err(e) => {
                let runtime = Self::from_config(&XiuxianConfig::default());
                warn!(error = %e, "Failed to load config, using defaults");
                runtime
            }
        }
    }

    /// Creates a runtime builder for custom configuration.
    pub fn builder() -> RuntimeBuilder<A> {
        RuntimeBuilder::new()
    }

    /// Creates a new runtime from configuration and initializes logging.
    ///
    /// The configuration is used as given; call
    /// [`validate_config`](crate::config::validate_config) first if it comes
    /// from an untrusted source.
    pub fn from_config(config: &XiuxianConfig) -> Self {
        logging::init_from_config(&config.logging);

        info!(
            log_level = %config.logging.level,
            regex_size_limit = config.matching.regex_size_limit,
            max_rules = ?config.matching.max_rules,
            "Runtime initialized from configuration"
        );

        Self {
            config: Arc::new(config.clone()),
            router: SharedRouter::default(),
        }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &XiuxianConfig {
        &self.config
    }

    /// Returns the shared router.
    pub fn router(&self) -> &SharedRouter<A> {
        &self.router
    }

    /// Returns the regex compile limits taken from the configuration.
    pub fn limits(&self) -> RegexLimits {
        self.config.matching.regex_limits()
    }

    /// Starts a rule builder that compiles with the configured limits.
    pub fn rule_builder(
        &self,
        kind: RuleKind,
        pattern: impl Into<String>,
        action: A,
    ) -> RuleBuilder<A> {
        Rule::builder(kind, pattern, action).limits(self.limits())
    }

    /// Builds a rule with default flags and the configured limits.
    pub fn rule(
        &self,
        kind: RuleKind,
        pattern: impl Into<String>,
        action: A,
    ) -> RuntimeResult<Rule<A>> {
        Ok(self.rule_builder(kind, pattern, action).build()?)
    }

    /// Appends a rule to the shared router.
    ///
    /// Fails without changing the router once `matching.max_rules` rules
    /// are registered.
    pub fn register(&self, rule: Rule<A>) -> RuntimeResult<()> {
        let max_rules = self.config.matching.max_rules;
        self.router.update(|router| {
            if let Some(max) = max_rules.filter(|&max| router.len() >= max) {
                return Err(RuntimeError::RuleLimitReached { max });
            }
            debug!(kind = %rule.kind(), pattern = rule.pattern(), "Registering rule");
            router.add(rule);
            Ok(())
        })
    }

    /// Replaces every registered rule at once.
    pub fn replace(&self, router: Router<A>) -> RuntimeResult<()> {
        if let Some(max) = self.config.matching.max_rules.filter(|&max| router.len() > max) {
            return Err(RuntimeError::RuleLimitReached { max });
        }
        self.router.replace(router);
        Ok(())
    }

    /// Evaluates an event against the current rule snapshot.
    pub fn evaluate(&self, event: &Event) -> Vec<Matched<A>> {
        self.router.evaluate(event)
    }
}

/// Builder for creating a [`XiuxianRuntime`] with custom configuration.
pub struct RuntimeBuilder<A> {
    config_loader: ConfigLoader,
    _action: PhantomData<fn() -> A>,
}

impl<A> RuntimeBuilder<A> {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
            _action: PhantomData,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges a base configuration; files and environment still win.
    pub fn merge(mut self, config: XiuxianConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Overrides a single dotted key over every other source.
    pub fn set<T: Serialize>(mut self, key: &str, value: T) -> Self {
        self.config_loader = self.config_loader.set(key, value);
        self
    }

    /// Loads, validates and builds the runtime.
    pub fn build(self) -> RuntimeResult<XiuxianRuntime<A>> {
        let config = self.config_loader.load()?;
        validate_config(&config)?;
        Ok(XiuxianRuntime::from_config(&config))
    }
}

impl<A> Default for RuntimeBuilder<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchingConfig;
    use figment::Jail;
    use xiuxian_core::Content;

    fn runtime_with(matching: MatchingConfig) -> XiuxianRuntime<&'static str> {
        XiuxianRuntime::from_config(&XiuxianConfig {
            matching,
            ..Default::default()
        })
    }

    fn text_event(text: &str) -> Event {
        Event::default().with_raw_text(text)
    }

    #[test]
    fn test_register_and_evaluate() {
        let runtime = runtime_with(MatchingConfig::default());
        runtime
            .register(runtime.rule(RuleKind::Command, "/help", "help").unwrap())
            .unwrap();
        runtime
            .register(runtime.rule(RuleKind::Keyword, "weather", "weather").unwrap())
            .unwrap();

        let matched = runtime.evaluate(&text_event("/help weather"));
        let actions: Vec<_> = matched.iter().map(|m| *m.action()).collect();
        assert_eq!(actions, vec!["help", "weather"]);
        assert_eq!(matched[0].event.text, " weather");
    }

    #[test]
    fn test_rule_limit() {
        let runtime = runtime_with(MatchingConfig {
            max_rules: Some(1),
            ..Default::default()
        });
        runtime
            .register(runtime.rule(RuleKind::Prefix, "a", "a").unwrap())
            .unwrap();

        let err = runtime
            .register(runtime.rule(RuleKind::Prefix, "b", "b").unwrap())
            .unwrap_err();
        assert!(matches!(err, RuntimeError::RuleLimitReached { max: 1 }));
        assert_eq!(runtime.router().len(), 1);

        let mut router = Router::new();
        router.add(runtime.rule(RuleKind::Prefix, "c", "c").unwrap());
        router.add(runtime.rule(RuleKind::Prefix, "d", "d").unwrap());
        assert!(runtime.replace(router).is_err());
        assert_eq!(runtime.router().len(), 1);
    }

    #[test]
    fn test_configured_regex_limits() {
        let runtime = runtime_with(MatchingConfig {
            regex_size_limit: 64,
            ..Default::default()
        });
        assert_eq!(runtime.limits().size_limit, 64);

        let err = runtime
            .rule(RuleKind::Regex, r"\w{1000}", "big")
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Rule(_)));

        // Non-regex kinds never compile.
        assert!(runtime.rule(RuleKind::Prefix, r"\w{1000}", "prefix").is_ok());
    }

    #[test]
    fn test_builder_flags_survive_limits() {
        let runtime = runtime_with(MatchingConfig::default());
        let rule = runtime
            .rule_builder(RuleKind::Regex, r"\d+", "dice")
            .block(true)
            .to_me(true)
            .build()
            .unwrap();
        runtime.register(rule).unwrap();
        runtime
            .register(runtime.rule(RuleKind::Keyword, "1", "never").unwrap())
            .unwrap();

        // Not addressed: the blocking regex rule is skipped entirely.
        let matched = runtime.evaluate(&text_event("roll 1"));
        assert_eq!(matched.len(), 1);
        assert_eq!(*matched[0].action(), "never");

        let addressed = text_event("roll 12").to_me(true);
        let matched = runtime.evaluate(&addressed);
        assert_eq!(matched.len(), 1);
        assert_eq!(*matched[0].action(), "dice");
        assert_eq!(matched[0].event.command, "12");
    }

    #[test]
    fn test_clones_share_router() {
        let runtime = runtime_with(MatchingConfig::default());
        let other = runtime.clone();
        other
            .register(other.rule(RuleKind::Suffix, "?", "question").unwrap())
            .unwrap();
        assert_eq!(runtime.router().len(), 1);

        let event = Event::from_receive(xiuxian_core::MessageReceive {
            content: vec![Content::text("why?")],
            ..Default::default()
        });
        assert_eq!(runtime.evaluate(&event).len(), 1);
    }

    #[test]
    fn test_builder_loads_and_validates() {
        Jail::expect_with(|jail| {
            jail.set_env("XIUXIAN_MATCHING__MAX_RULES", "2");
            let runtime: XiuxianRuntime<()> = XiuxianRuntime::builder()
                .build()
                .map_err(|e| e.to_string())?;
            assert_eq!(runtime.config().matching.max_rules, Some(2));

            jail.set_env("XIUXIAN_MATCHING__REGEX_NEST_LIMIT", "0");
            let result: RuntimeResult<XiuxianRuntime<()>> = XiuxianRuntime::builder().build();
            assert!(matches!(result, Err(RuntimeError::Config(_))));
            Ok(())
        });
    }
}
