//! Scriptable in-memory double of the remote driver boundary.
//!
//! Scenarios script a sequence of [`MockScreen`]s (element sets, serialized
//! tree text, synthesized screenshot bytes) and point the harness at a
//! [`MockDriver`]. The driver records every call in a journal for spy
//! assertions, supports per-operation fault injection, and models an
//! orientation change as a width/height swap (or a refusal, when locked).
//!
//! Testing the actual resolution and comparison code against this double is
//! the point — the mock implements the same [`UiDriver`] surface a live
//! bridge binding would.

use crate::driver::{Orientation, ScreenSize, UiDriver, UiElement};
use crate::locator::{LocatorStrategy, SelectorKind};
use crate::result::{TantearError, TantearResult};
use image::ImageEncoder;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, OnceLock};

/// One UI node in a scripted screen.
#[derive(Debug, Clone, Default)]
pub struct MockNode {
    attrs: BTreeMap<String, String>,
}

impl MockNode {
    /// Create an attribute-less node
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute by bridge name
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Mark the node clickable
    #[must_use]
    pub fn clickable(self) -> Self {
        self.with_attr("clickable", "true")
    }

    fn label(&self) -> String {
        self.attrs
            .get("text")
            .or_else(|| self.attrs.get("content-desc"))
            .or_else(|| self.attrs.get("resource-id"))
            .cloned()
            .unwrap_or_else(|| String::from("<node>"))
    }

    fn matches(&self, strategy: &LocatorStrategy) -> bool {
        match strategy.kind {
            SelectorKind::Text => self.attrs.get("text") == Some(&strategy.expression),
            SelectorKind::ContentDesc => {
                self.attrs.get("content-desc") == Some(&strategy.expression)
            }
            SelectorKind::ResourceId => {
                self.attrs.get("resource-id") == Some(&strategy.expression)
            }
            SelectorKind::ClassName => self.attrs.get("class") == Some(&strategy.expression),
            SelectorKind::Xpath => self.matches_xpath(&strategy.expression),
        }
    }

    /// Minimal xpath interpretation: `contains(@attr, 'value')` predicates
    /// and `@attr='value'` equality predicates, combined with OR semantics
    /// unless the expression contains ` and `. Enough for the fallback
    /// expressions the page objects declare; not an xpath engine.
    fn matches_xpath(&self, expression: &str) -> bool {
        let contains_re = xpath_contains_re();
        let equals_re = xpath_equals_re();

        let mut checks: Vec<bool> = Vec::new();
        for cap in contains_re.captures_iter(expression) {
            let attr = &cap[1];
            let needle = &cap[2];
            checks.push(
                self.attrs
                    .get(attr)
                    .is_some_and(|value| value.contains(needle)),
            );
        }
        for cap in equals_re.captures_iter(expression) {
            let attr = &cap[1];
            let expected = &cap[2];
            checks.push(self.attrs.get(attr).is_some_and(|value| value == expected));
        }
        if checks.is_empty() {
            return false;
        }
        if expression.contains(" and ") {
            checks.iter().all(|&ok| ok)
        } else {
            checks.iter().any(|&ok| ok)
        }
    }
}

fn xpath_contains_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"contains\(@([A-Za-z-]+),\s*'([^']*)'\)").unwrap())
}

fn xpath_equals_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@([A-Za-z-]+)='([^']*)'").unwrap())
}

/// One scripted screen state.
#[derive(Debug, Clone)]
pub struct MockScreen {
    name: String,
    source: String,
    nodes: Vec<MockNode>,
    shot: Vec<u8>,
}

impl MockScreen {
    /// Create a screen with a derived serialized tree and a small gray shot
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            source: format!("<hierarchy screen='{name}'/>"),
            shot: solid_png(64, 64, (120, 120, 120)),
            nodes: Vec::new(),
            name,
        }
    }

    /// Replace the serialized UI tree text
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Append a node
    #[must_use]
    pub fn with_node(mut self, node: MockNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Replace the screenshot bytes
    #[must_use]
    pub fn with_shot(mut self, shot: Vec<u8>) -> Self {
        self.shot = shot;
        self
    }

    /// Screen name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Default)]
struct MockState {
    screens: Vec<MockScreen>,
    current: usize,
    size: ScreenSize,
    orientation: Orientation,
    orientation_locked: bool,
    advance_on_tap: bool,
    failures: HashMap<String, u32>,
    journal: Vec<String>,
    swipes: Vec<(i32, i32, i32, i32, u32)>,
}

impl MockState {
    fn screen(&self) -> MockScreen {
        self.screens
            .get(self.current.min(self.screens.len().saturating_sub(1)))
            .cloned()
            .unwrap_or_else(|| MockScreen::named("empty"))
    }

    fn consume_failure(&mut self, op: &str) -> bool {
        match self.failures.get_mut(op) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }

    fn advance(&mut self) {
        if self.advance_on_tap && self.current + 1 < self.screens.len() {
            self.current += 1;
        }
    }
}

/// Scriptable [`UiDriver`] double.
///
/// Cloning shares the underlying state, so a test can keep a handle for
/// journal assertions while the session owns a boxed clone.
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    /// Create a driver reporting the given portrait screen size
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let driver = Self::default();
        {
            let mut state = driver.state.lock().unwrap();
            state.size = ScreenSize::new(width, height);
            state.orientation = if height >= width {
                Orientation::Portrait
            } else {
                Orientation::Landscape
            };
        }
        driver
    }

    /// Append a scripted screen (builder style)
    #[must_use]
    pub fn with_screen(self, screen: MockScreen) -> Self {
        self.state.lock().unwrap().screens.push(screen);
        self
    }

    /// Jump to screen `index` (saturating)
    pub fn set_screen(&self, index: usize) {
        let mut state = self.state.lock().unwrap();
        state.current = index.min(state.screens.len().saturating_sub(1));
    }

    /// Advance to the next screen on every tap (saturating at the last)
    pub fn advance_on_tap(&self, enabled: bool) {
        self.state.lock().unwrap().advance_on_tap = enabled;
    }

    /// Refuse orientation changes
    pub fn lock_orientation(&self, locked: bool) {
        self.state.lock().unwrap().orientation_locked = locked;
    }

    /// Fail the next `times` invocations of `op`
    /// (`find_elements`, `tap`, `swipe`, `window_size`, `screenshot`,
    /// `page_source`, `orientation`, `set_orientation`, `background_app`,
    /// `quit`, `element_tap`).
    pub fn fail_next(&self, op: &str, times: u32) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(op.to_string(), times);
    }

    /// Copy of the call journal
    #[must_use]
    pub fn journal(&self) -> Vec<String> {
        self.state.lock().unwrap().journal.clone()
    }

    /// Recorded swipes as `(x1, y1, x2, y2, duration_ms)`
    #[must_use]
    pub fn swipes(&self) -> Vec<(i32, i32, i32, i32, u32)> {
        self.state.lock().unwrap().swipes.clone()
    }

    /// Number of tap calls delivered (coordinate taps and element taps)
    #[must_use]
    pub fn tap_count(&self) -> usize {
        self.count_prefix("tap[") + self.count_prefix("element_tap[")
    }

    /// Number of `find_elements` calls whose strategy contained `needle`
    #[must_use]
    pub fn find_count_for(&self, needle: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .journal
            .iter()
            .filter(|entry| entry.starts_with("find_elements[") && entry.contains(needle))
            .count()
    }

    /// Number of quit calls delivered
    #[must_use]
    pub fn quit_count(&self) -> usize {
        self.count_prefix("quit")
    }

    /// Name of the currently displayed scripted screen
    #[must_use]
    pub fn current_screen(&self) -> String {
        self.state.lock().unwrap().screen().name.clone()
    }

    fn count_prefix(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .journal
            .iter()
            .filter(|entry| entry.starts_with(prefix))
            .count()
    }

    fn record(&self, entry: String) {
        self.state.lock().unwrap().journal.push(entry);
    }

    fn check_failure(&self, op: &str) -> TantearResult<()> {
        if self.state.lock().unwrap().consume_failure(op) {
            Err(TantearError::transport(op, "injected fault"))
        } else {
            Ok(())
        }
    }
}

impl UiDriver for MockDriver {
    fn find_elements(&self, strategy: &LocatorStrategy) -> TantearResult<Vec<Box<dyn UiElement>>> {
        self.record(format!("find_elements[{strategy}]"));
        self.check_failure("find_elements")?;
        let screen = self.state.lock().unwrap().screen();
        let found = screen
            .nodes
            .iter()
            .filter(|node| node.matches(strategy))
            .map(|node| {
                Box::new(MockElement {
                    state: Arc::clone(&self.state),
                    attrs: node.attrs.clone(),
                    label: node.label(),
                }) as Box<dyn UiElement>
            })
            .collect();
        Ok(found)
    }

    fn tap(&self, points: &[(i32, i32)]) -> TantearResult<()> {
        self.record(format!("tap[{points:?}]"));
        self.check_failure("tap")?;
        self.state.lock().unwrap().advance();
        Ok(())
    }

    fn swipe(&self, x1: i32, y1: i32, x2: i32, y2: i32, duration_ms: u32) -> TantearResult<()> {
        self.record(format!("swipe[({x1},{y1})->({x2},{y2}) {duration_ms}ms]"));
        self.check_failure("swipe")?;
        let mut state = self.state.lock().unwrap();
        state.swipes.push((x1, y1, x2, y2, duration_ms));
        if state.advance_on_tap && state.current + 1 < state.screens.len() {
            state.current += 1;
        }
        Ok(())
    }

    fn window_size(&self) -> TantearResult<ScreenSize> {
        self.record(String::from("window_size"));
        self.check_failure("window_size")?;
        Ok(self.state.lock().unwrap().size)
    }

    fn screenshot_png(&self) -> TantearResult<Vec<u8>> {
        self.record(String::from("screenshot"));
        self.check_failure("screenshot")?;
        Ok(self.state.lock().unwrap().screen().shot)
    }

    fn page_source(&self) -> TantearResult<String> {
        self.record(String::from("page_source"));
        self.check_failure("page_source")?;
        Ok(self.state.lock().unwrap().screen().source)
    }

    fn orientation(&self) -> TantearResult<Orientation> {
        self.record(String::from("orientation"));
        self.check_failure("orientation")?;
        Ok(self.state.lock().unwrap().orientation)
    }

    fn set_orientation(&self, orientation: Orientation) -> TantearResult<()> {
        self.record(format!("set_orientation[{orientation}]"));
        self.check_failure("set_orientation")?;
        let mut state = self.state.lock().unwrap();
        if state.orientation_locked {
            return Err(TantearError::OrientationLocked {
                message: String::from("rotation refused by app"),
            });
        }
        if state.orientation != orientation {
            state.orientation = orientation;
            state.size = ScreenSize::new(state.size.height, state.size.width);
        }
        Ok(())
    }

    fn background_app(&self, seconds: u32) -> TantearResult<()> {
        self.record(format!("background_app[{seconds}]"));
        self.check_failure("background_app")
    }

    fn quit(&self) -> TantearResult<()> {
        self.record(String::from("quit"));
        self.check_failure("quit")
    }
}

struct MockElement {
    state: Arc<Mutex<MockState>>,
    attrs: BTreeMap<String, String>,
    label: String,
}

impl UiElement for MockElement {
    fn attr(&self, name: &str) -> Option<String> {
        self.attrs.get(name).cloned()
    }

    fn tap(&self) -> TantearResult<()> {
        let mut state = self.state.lock().unwrap();
        state.journal.push(format!("element_tap[{}]", self.label));
        if state.consume_failure("element_tap") {
            return Err(TantearError::transport("element_tap", "injected fault"));
        }
        state.advance();
        Ok(())
    }
}

/// Encode a solid-color PNG for scripted screenshots.
#[must_use]
pub fn solid_png(width: u32, height: u32, color: (u8, u8, u8)) -> Vec<u8> {
    striped_png(width, height, &[color])
}

/// Encode a PNG of equal-width vertical stripes.
///
/// Stripes let a scripted shot place chosen colors under the standard
/// five-point sample grid.
#[must_use]
pub fn striped_png(width: u32, height: u32, stripes: &[(u8, u8, u8)]) -> Vec<u8> {
    let stripes = if stripes.is_empty() {
        &[(0, 0, 0)][..]
    } else {
        stripes
    };
    let img = image::RgbImage::from_fn(width, height, |x, _y| {
        let idx = ((x as usize) * stripes.len() / width as usize).min(stripes.len() - 1);
        let (r, g, b) = stripes[idx];
        image::Rgb([r, g, b])
    });
    let mut buffer = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buffer);
    encoder
        .write_image(
            img.as_raw(),
            width,
            height,
            image::ExtendedColorType::Rgb8,
        )
        .expect("png encode of scripted screenshot");
    buffer
}
