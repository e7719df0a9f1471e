//! Ordered-fallback element resolution.
//!
//! A logical UI target ("play button") is declared once with an ordered
//! list of locator strategies. The resolver tries each strategy against the
//! live UI tree with a bounded poll; the first strategy that matches wins
//! and later strategies are never consulted. This is a precedence policy,
//! not best-effort merging: even the multi-element variant stops at the
//! first strategy yielding any results.
//!
//! Exhausting the list is not an error — the resolver returns an absent
//! result and the calling scenario decides what absence means. A strategy
//! that fails at the transport level is treated identically to "not found"
//! for resolution purposes, but is logged at `warn` instead of `debug` so
//! the two remain distinguishable in telemetry.

use crate::config::Timeouts;
use crate::driver::{ElementInfo, UiDriver, UiElement};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Xpath matching every node the bridge marks clickable
pub const CLICKABLE_XPATH: &str = "//*[@clickable='true']";

/// Selector kinds understood by the mobile automation bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    /// Xpath over the serialized UI tree
    Xpath,
    /// Exact `text` attribute match
    Text,
    /// Exact `content-desc` attribute match
    ContentDesc,
    /// Exact `resource-id` attribute match
    ResourceId,
    /// Exact `class` attribute match
    ClassName,
}

impl SelectorKind {
    /// Bridge wire name for this selector kind
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Xpath => "xpath",
            Self::Text => "text",
            Self::ContentDesc => "accessibility id",
            Self::ResourceId => "id",
            Self::ClassName => "class name",
        }
    }
}

/// One (selector kind, selector expression) pair.
///
/// Immutable once declared; a target's strategies are tried in declared
/// order with no ranking beyond that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorStrategy {
    /// Selector kind
    pub kind: SelectorKind,
    /// Selector expression in the kind's syntax
    pub expression: String,
}

impl LocatorStrategy {
    /// Create a strategy
    #[must_use]
    pub fn new(kind: SelectorKind, expression: impl Into<String>) -> Self {
        Self {
            kind,
            expression: expression.into(),
        }
    }

    /// Xpath strategy
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::new(SelectorKind::Xpath, expression)
    }

    /// Exact-text strategy
    #[must_use]
    pub fn text(expression: impl Into<String>) -> Self {
        Self::new(SelectorKind::Text, expression)
    }

    /// Accessibility-description strategy
    #[must_use]
    pub fn content_desc(expression: impl Into<String>) -> Self {
        Self::new(SelectorKind::ContentDesc, expression)
    }

    /// Resource-id strategy
    #[must_use]
    pub fn resource_id(expression: impl Into<String>) -> Self {
        Self::new(SelectorKind::ResourceId, expression)
    }

    /// Xpath strategy matching any node whose text or accessibility
    /// description contains `needle`.
    #[must_use]
    pub fn any_text_contains(needle: &str) -> Self {
        Self::xpath(format!(
            "//*[contains(@text, '{needle}') or contains(@content-desc, '{needle}')]"
        ))
    }
}

impl std::fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.kind.as_str(), self.expression)
    }
}

/// A named logical UI target with its ordered fallback strategies.
#[derive(Debug, Clone)]
pub struct Target {
    name: String,
    strategies: Vec<LocatorStrategy>,
}

impl Target {
    /// Create an empty target; chain [`Target::or`] to declare strategies
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strategies: Vec::new(),
        }
    }

    /// Append a fallback strategy (declaration order is resolution order)
    #[must_use]
    pub fn or(mut self, strategy: LocatorStrategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Target name for logging
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared strategies in resolution order
    #[must_use]
    pub fn strategies(&self) -> &[LocatorStrategy] {
        &self.strategies
    }
}

/// Resolver over a live driver session.
pub struct LocatorResolver<'a> {
    driver: &'a dyn UiDriver,
    timeouts: Timeouts,
}

impl<'a> LocatorResolver<'a> {
    /// Create a resolver borrowing the session's driver
    #[must_use]
    pub fn new(driver: &'a dyn UiDriver, timeouts: Timeouts) -> Self {
        Self { driver, timeouts }
    }

    /// Resolve `target` to its first matching element, polling each
    /// strategy for the configured per-strategy wait.
    #[must_use]
    pub fn resolve(&self, target: &Target) -> Option<Box<dyn UiElement>> {
        self.resolve_with_timeout(target, self.timeouts.element_wait)
    }

    /// Resolve `target` with an explicit per-strategy wait.
    #[must_use]
    pub fn resolve_with_timeout(
        &self,
        target: &Target,
        per_strategy: Duration,
    ) -> Option<Box<dyn UiElement>> {
        for (rank, strategy) in target.strategies().iter().enumerate() {
            let mut found = self.poll_strategy(target.name(), strategy, per_strategy);
            if !found.is_empty() {
                debug!(ui_target = target.name(), rank, %strategy, "target resolved");
                return Some(found.swap_remove(0));
            }
        }
        debug!(ui_target = target.name(), "all strategies exhausted");
        None
    }

    /// Resolve every element matched by the first strategy that yields any.
    ///
    /// Later strategies are never consulted once one succeeds, even if they
    /// would have matched more elements.
    #[must_use]
    pub fn resolve_all(&self, target: &Target) -> Vec<Box<dyn UiElement>> {
        for (rank, strategy) in target.strategies().iter().enumerate() {
            let found = self.poll_strategy(target.name(), strategy, self.timeouts.element_wait);
            if !found.is_empty() {
                debug!(
                    ui_target = target.name(),
                    rank,
                    count = found.len(),
                    "target resolved to element set"
                );
                return found;
            }
        }
        debug!(ui_target = target.name(), "all strategies exhausted");
        Vec::new()
    }

    /// Poll a single strategy until it matches or `timeout` elapses.
    #[must_use]
    pub fn resolve_strategy(
        &self,
        strategy: &LocatorStrategy,
        timeout: Duration,
    ) -> Option<Box<dyn UiElement>> {
        let mut found = self.poll_strategy("<single>", strategy, timeout);
        if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        }
    }

    /// Single immediate probe for a strategy, without waiting.
    #[must_use]
    pub fn is_present(&self, strategy: &LocatorStrategy) -> bool {
        !self.query(strategy).is_empty()
    }

    /// Poll until no element matches `strategy`, or until `timeout`.
    ///
    /// Returns `true` once the element is gone. A transport failure counts
    /// as "still unknown" rather than "gone", so a flaky bridge cannot fake
    /// a disappearance.
    #[must_use]
    pub fn wait_until_gone(&self, strategy: &LocatorStrategy, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            match self.driver.find_elements(strategy) {
                Ok(found) if found.is_empty() => {
                    debug!(%strategy, "element gone");
                    return true;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(%strategy, error = %err, "transport error while waiting for disappearance");
                }
            }
            if Instant::now() >= deadline {
                debug!(%strategy, "element still present at timeout");
                return false;
            }
            std::thread::sleep(self.timeouts.poll_interval);
        }
    }

    /// All nodes the bridge marks clickable, right now.
    #[must_use]
    pub fn clickable_elements(&self) -> Vec<Box<dyn UiElement>> {
        self.query(&LocatorStrategy::xpath(CLICKABLE_XPATH))
    }

    /// Attribute snapshots of every clickable node, for debug output.
    #[must_use]
    pub fn element_infos(&self) -> Vec<ElementInfo> {
        self.clickable_elements()
            .iter()
            .enumerate()
            .map(|(index, element)| element.info(index))
            .collect()
    }

    fn poll_strategy(
        &self,
        target: &str,
        strategy: &LocatorStrategy,
        timeout: Duration,
    ) -> Vec<Box<dyn UiElement>> {
        let deadline = Instant::now() + timeout;
        loop {
            let found = self.query_for(target, strategy);
            if !found.is_empty() {
                return found;
            }
            if Instant::now() >= deadline {
                return Vec::new();
            }
            std::thread::sleep(self.timeouts.poll_interval);
        }
    }

    fn query(&self, strategy: &LocatorStrategy) -> Vec<Box<dyn UiElement>> {
        self.query_for("<ad hoc>", strategy)
    }

    /// One query against the live tree. Transport errors resolve to "not
    /// found" but are logged at `warn`, keeping true absence (`debug`)
    /// distinguishable in telemetry.
    fn query_for(&self, target: &str, strategy: &LocatorStrategy) -> Vec<Box<dyn UiElement>> {
        match self.driver.find_elements(strategy) {
            Ok(found) => {
                if found.is_empty() {
                    debug!(ui_target = target, %strategy, "no match");
                }
                found
            }
            Err(err) => {
                warn!(ui_target = target, %strategy, error = %err, "transport error treated as no match");
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for LocatorResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocatorResolver")
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockNode, MockScreen};

    fn fast_timeouts() -> Timeouts {
        Timeouts::default()
            .with_element_wait(Duration::from_millis(20))
            .with_poll_interval(Duration::from_millis(1))
    }

    fn menu_driver() -> MockDriver {
        let screen = MockScreen::named("menu")
            .with_source("<hierarchy><node text='Play'/></hierarchy>")
            .with_node(MockNode::new().with_attr("text", "Play").clickable())
            .with_node(MockNode::new().with_attr("content-desc", "Settings").clickable());
        MockDriver::new(1080, 1920).with_screen(screen)
    }

    mod strategy_tests {
        use super::*;

        #[test]
        fn test_display_carries_kind_and_expression() {
            let strategy = LocatorStrategy::xpath("//*[contains(@text, 'Play')]");
            let rendered = strategy.to_string();
            assert!(rendered.starts_with("xpath="));
            assert!(rendered.contains("Play"));
        }

        #[test]
        fn test_any_text_contains_covers_both_attrs() {
            let driver = menu_driver();
            let resolver = LocatorResolver::new(&driver, fast_timeouts());
            // "Play" lives in @text, "Settings" in @content-desc; one
            // strategy shape finds both.
            assert!(resolver.is_present(&LocatorStrategy::any_text_contains("Play")));
            assert!(resolver.is_present(&LocatorStrategy::any_text_contains("Settings")));
            assert!(!resolver.is_present(&LocatorStrategy::any_text_contains("Shop")));
        }

        #[test]
        fn test_target_preserves_declaration_order() {
            let target = Target::named("play button")
                .or(LocatorStrategy::text("Play"))
                .or(LocatorStrategy::resource_id("play"));
            assert_eq!(target.strategies().len(), 2);
            assert_eq!(target.strategies()[0].kind, SelectorKind::Text);
            assert_eq!(target.strategies()[1].kind, SelectorKind::ResourceId);
        }
    }

    mod resolve_tests {
        use super::*;

        #[test]
        fn test_first_strategy_wins() {
            let driver = menu_driver();
            let resolver = LocatorResolver::new(&driver, fast_timeouts());
            let target = Target::named("play button")
                .or(LocatorStrategy::text("Play"))
                .or(LocatorStrategy::text("PLAY"));

            let element = resolver.resolve(&target).expect("first strategy matches");
            assert_eq!(element.text().as_deref(), Some("Play"));
            // Spy check: the second strategy was never sent to the driver.
            assert_eq!(driver.find_count_for("PLAY"), 0);
        }

        #[test]
        fn test_fallback_consulted_after_miss() {
            let driver = menu_driver();
            let resolver = LocatorResolver::new(&driver, fast_timeouts());
            let target = Target::named("settings button")
                .or(LocatorStrategy::text("Options"))
                .or(LocatorStrategy::content_desc("Settings"));

            let element = resolver.resolve(&target).expect("fallback matches");
            assert_eq!(element.attr("content-desc").as_deref(), Some("Settings"));
            assert!(driver.find_count_for("Options") >= 1);
        }

        #[test]
        fn test_exhausted_list_is_absent_not_error() {
            let driver = menu_driver();
            let resolver = LocatorResolver::new(&driver, fast_timeouts());
            let target = Target::named("shop button").or(LocatorStrategy::text("Shop"));
            assert!(resolver.resolve(&target).is_none());
        }

        #[test]
        fn test_transport_error_skips_to_next_strategy() {
            let driver = menu_driver();
            driver.fail_next("find_elements", 1);
            let resolver = LocatorResolver::new(&driver, fast_timeouts());
            let target = Target::named("play button")
                .or(LocatorStrategy::text("nothing matches this"))
                .or(LocatorStrategy::text("Play"));

            // First strategy dies on transport, is treated as not-found,
            // and the fallback still resolves.
            let element = resolver.resolve(&target);
            assert!(element.is_some());
        }

        #[test]
        fn test_resolve_all_stops_at_first_yielding_strategy() {
            let screen = MockScreen::named("map")
                .with_node(MockNode::new().with_attr("content-desc", "Level 1").clickable())
                .with_node(MockNode::new().with_attr("content-desc", "Level 2").clickable())
                .with_node(MockNode::new().with_attr("text", "Back").clickable());
            let driver = MockDriver::new(1080, 1920).with_screen(screen);
            let resolver = LocatorResolver::new(&driver, fast_timeouts());

            let target = Target::named("level buttons")
                .or(LocatorStrategy::xpath("//*[contains(@content-desc, 'Level')]"))
                .or(LocatorStrategy::xpath(CLICKABLE_XPATH));

            let found = resolver.resolve_all(&target);
            // The clickable fallback would have matched 3 elements, but the
            // first yielding strategy takes precedence.
            assert_eq!(found.len(), 2);
            assert_eq!(driver.find_count_for(CLICKABLE_XPATH), 0);
        }
    }

    mod presence_tests {
        use super::*;

        #[test]
        fn test_is_present_probes_once() {
            let driver = menu_driver();
            let resolver = LocatorResolver::new(&driver, fast_timeouts());
            assert!(resolver.is_present(&LocatorStrategy::text("Play")));
            assert!(!resolver.is_present(&LocatorStrategy::text("Shop")));
        }

        #[test]
        fn test_wait_until_gone_times_out_while_present() {
            let driver = menu_driver();
            let resolver = LocatorResolver::new(&driver, fast_timeouts());
            let gone = resolver
                .wait_until_gone(&LocatorStrategy::text("Play"), Duration::from_millis(20));
            assert!(!gone);
        }

        #[test]
        fn test_wait_until_gone_sees_absence() {
            let driver = menu_driver();
            let resolver = LocatorResolver::new(&driver, fast_timeouts());
            let gone = resolver
                .wait_until_gone(&LocatorStrategy::text("Shop"), Duration::from_millis(20));
            assert!(gone);
        }

        #[test]
        fn test_clickable_listing() {
            let driver = menu_driver();
            let resolver = LocatorResolver::new(&driver, fast_timeouts());
            let infos = resolver.element_infos();
            assert_eq!(infos.len(), 2);
            assert_eq!(infos[0].text, "Play");
            assert_eq!(infos[1].content_desc, "Settings");
        }
    }
}
