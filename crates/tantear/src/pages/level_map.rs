//! Level map page object.

use super::tap_quietly;
use crate::driver::UiElement;
use crate::locator::{LocatorStrategy, Target};
use crate::session::Session;
use serde::{Deserialize, Serialize};

/// Debug summary of the level map screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapInfo {
    /// Number of level buttons the first yielding strategy matched
    pub levels_count: usize,
    /// Whether a back button resolved
    pub has_back_button: bool,
    /// Number of clickable elements visible
    pub clickable_elements: usize,
}

/// The level selection map.
pub struct LevelMapPage<'a> {
    session: &'a Session,
}

impl<'a> LevelMapPage<'a> {
    /// Create the page over a live session
    #[must_use]
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn level_buttons_target() -> Target {
        Target::named("level buttons")
            .or(LocatorStrategy::xpath(
                "//*[contains(@content-desc, 'Level') or contains(@content-desc, 'level')]",
            ))
            .or(LocatorStrategy::xpath(
                "//*[contains(@text, 'Level') or contains(@text, 'level')]",
            ))
            .or(LocatorStrategy::xpath("//*[contains(@resource-id, 'level')]"))
            .or(LocatorStrategy::xpath(
                "//*[contains(@class, 'Button') and @clickable='true']",
            ))
    }

    fn back_button() -> Target {
        Target::named("back button")
            .or(LocatorStrategy::xpath(
                "//*[contains(@content-desc, 'Back') or contains(@content-desc, 'back')]",
            ))
            .or(LocatorStrategy::xpath("//*[contains(@text, 'Back')]"))
            .or(LocatorStrategy::xpath("//*[contains(@resource-id, 'back')]"))
    }

    /// All level buttons from the first strategy that yields any.
    ///
    /// Later strategies are never consulted once one matches — the generic
    /// clickable-button fallback only applies when nothing level-like
    /// resolves at all.
    #[must_use]
    pub fn level_buttons(&self) -> Vec<Box<dyn UiElement>> {
        self.session
            .resolver()
            .resolve_all(&Self::level_buttons_target())
    }

    /// Resolve the back button through its fallback list
    #[must_use]
    pub fn find_back_button(&self) -> Option<Box<dyn UiElement>> {
        self.session.resolver().resolve(&Self::back_button())
    }

    /// Whether the map appears on screen: level buttons or a back button.
    #[must_use]
    pub fn is_displayed(&self) -> bool {
        !self.level_buttons().is_empty() || self.find_back_button().is_some()
    }

    /// Tap the first available level; `false` when none resolve.
    #[must_use]
    pub fn tap_first_level(&self) -> bool {
        let buttons = self.level_buttons();
        match buttons.first() {
            Some(button) => tap_quietly(button.as_ref(), "first level"),
            None => false,
        }
    }

    /// Tap the back button; `false` when absent or unresponsive.
    #[must_use]
    pub fn tap_back(&self) -> bool {
        match self.find_back_button() {
            Some(button) => tap_quietly(button.as_ref(), "back button"),
            None => false,
        }
    }

    /// Number of level buttons currently resolvable
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.level_buttons().len()
    }

    /// Collect a debug summary of the screen
    #[must_use]
    pub fn map_info(&self) -> MapInfo {
        MapInfo {
            levels_count: self.level_count(),
            has_back_button: self.find_back_button().is_some(),
            clickable_elements: self.session.resolver().clickable_elements().len(),
        }
    }
}
