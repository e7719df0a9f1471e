//! Main menu page object.

use super::tap_quietly;
use crate::driver::{ScreenSize, UiElement};
use crate::locator::{LocatorStrategy, Target};
use crate::session::Session;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Debug summary of the main menu screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuInfo {
    /// Number of clickable elements visible
    pub clickable_elements: usize,
    /// Whether a play button resolved
    pub has_play_button: bool,
    /// Whether a settings button resolved
    pub has_settings_button: bool,
    /// Screen size, when the device responded
    pub screen_size: Option<ScreenSize>,
}

/// The game's main menu.
pub struct MainMenuPage<'a> {
    session: &'a Session,
}

impl<'a> MainMenuPage<'a> {
    /// Create the page over a live session
    #[must_use]
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn play_button() -> Target {
        Target::named("play button")
            .or(LocatorStrategy::xpath(
                "//*[contains(@text, 'Play') or contains(@text, 'PLAY')]",
            ))
            .or(LocatorStrategy::xpath(
                "//*[contains(@content-desc, 'Play') or contains(@content-desc, 'play')]",
            ))
            .or(LocatorStrategy::xpath("//*[contains(@resource-id, 'play')]"))
            .or(LocatorStrategy::xpath(
                "//*[contains(@class, 'Button') and contains(@text, 'Play')]",
            ))
    }

    fn settings_button() -> Target {
        Target::named("settings button")
            .or(LocatorStrategy::xpath(
                "//*[contains(@content-desc, 'Settings') or contains(@content-desc, 'settings')]",
            ))
            .or(LocatorStrategy::xpath("//*[contains(@text, 'Settings')]"))
            .or(LocatorStrategy::xpath(
                "//*[contains(@resource-id, 'settings')]",
            ))
    }

    fn shop_button() -> Target {
        Target::named("shop button")
            .or(LocatorStrategy::xpath(
                "//*[contains(@content-desc, 'Shop') or contains(@content-desc, 'shop')]",
            ))
            .or(LocatorStrategy::xpath("//*[contains(@text, 'Shop')]"))
            .or(LocatorStrategy::xpath("//*[contains(@resource-id, 'shop')]"))
    }

    /// Resolve the play button through its fallback list
    #[must_use]
    pub fn find_play_button(&self) -> Option<Box<dyn UiElement>> {
        self.session.resolver().resolve(&Self::play_button())
    }

    /// Resolve the settings button through its fallback list
    #[must_use]
    pub fn find_settings_button(&self) -> Option<Box<dyn UiElement>> {
        self.session.resolver().resolve(&Self::settings_button())
    }

    /// Resolve the shop button through its fallback list
    #[must_use]
    pub fn find_shop_button(&self) -> Option<Box<dyn UiElement>> {
        self.session.resolver().resolve(&Self::shop_button())
    }

    /// Whether the menu appears on screen: a play button, or failing that,
    /// anything clickable at all.
    #[must_use]
    pub fn is_displayed(&self) -> bool {
        if self.find_play_button().is_some() {
            return true;
        }
        let clickable = self.session.resolver().clickable_elements();
        debug!(clickable = clickable.len(), "menu probe fell back to clickable scan");
        !clickable.is_empty()
    }

    /// Tap the play button; `false` when it is absent or unresponsive.
    #[must_use]
    pub fn tap_play(&self) -> bool {
        match self.find_play_button() {
            Some(button) => tap_quietly(button.as_ref(), "play button"),
            None => false,
        }
    }

    /// Tap the settings button; `false` when absent or unresponsive.
    #[must_use]
    pub fn tap_settings(&self) -> bool {
        match self.find_settings_button() {
            Some(button) => tap_quietly(button.as_ref(), "settings button"),
            None => false,
        }
    }

    /// Collect a debug summary of the screen
    #[must_use]
    pub fn screen_info(&self) -> MenuInfo {
        let resolver = self.session.resolver();
        MenuInfo {
            clickable_elements: resolver.clickable_elements().len(),
            has_play_button: self.find_play_button().is_some(),
            has_settings_button: self.find_settings_button().is_some(),
            screen_size: self.session.driver().window_size().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HarnessConfig, Timeouts};
    use crate::mock::{MockDriver, MockNode, MockScreen};
    use std::time::Duration;

    fn session_with(driver: MockDriver) -> (tempfile::TempDir, Session) {
        let tmp = tempfile::tempdir().unwrap();
        let config = HarnessConfig::default()
            .with_report_dir(tmp.path().join("reports"))
            .with_timeouts(
                Timeouts::default()
                    .with_launch_wait(Duration::ZERO)
                    .with_element_wait(Duration::from_millis(20))
                    .with_poll_interval(Duration::from_millis(1)),
            );
        let session = Session::start(Box::new(driver), config).unwrap();
        (tmp, session)
    }

    fn menu_screen() -> MockScreen {
        MockScreen::named("menu")
            .with_node(MockNode::new().with_attr("text", "Play").clickable())
            .with_node(
                MockNode::new()
                    .with_attr("content-desc", "Settings")
                    .clickable(),
            )
            .with_node(MockNode::new().with_attr("resource-id", "menu_shop").clickable())
    }

    #[test]
    fn test_play_button_resolves_on_first_strategy() {
        let driver = MockDriver::new(1080, 1920).with_screen(menu_screen());
        let handle = driver.clone();
        let (_tmp, session) = session_with(driver);

        let menu = session.main_menu();
        let button = menu.find_play_button().expect("play present");
        assert_eq!(button.text().as_deref(), Some("Play"));
        // Resource-id fallback never consulted
        assert_eq!(handle.find_count_for("resource-id, 'play'"), 0);
    }

    #[test]
    fn test_play_button_via_content_desc_fallback() {
        let screen = MockScreen::named("menu").with_node(
            MockNode::new()
                .with_attr("content-desc", "play area")
                .clickable(),
        );
        let driver = MockDriver::new(1080, 1920).with_screen(screen);
        let (_tmp, session) = session_with(driver);

        assert!(session.main_menu().find_play_button().is_some());
    }

    #[test]
    fn test_shop_button_via_resource_id_fallback() {
        let driver = MockDriver::new(1080, 1920).with_screen(menu_screen());
        let (_tmp, session) = session_with(driver);
        let shop = session.main_menu().find_shop_button().expect("shop present");
        assert_eq!(shop.attr("resource-id").as_deref(), Some("menu_shop"));
    }

    #[test]
    fn test_is_displayed_falls_back_to_clickable_scan() {
        let screen = MockScreen::named("menu")
            .with_node(MockNode::new().with_attr("text", "Something").clickable());
        let driver = MockDriver::new(1080, 1920).with_screen(screen);
        let (_tmp, session) = session_with(driver);

        assert!(session.main_menu().is_displayed());
    }

    #[test]
    fn test_tap_play_absent_is_false() {
        let driver = MockDriver::new(1080, 1920).with_screen(MockScreen::named("bare"));
        let (_tmp, session) = session_with(driver);
        assert!(!session.main_menu().tap_play());
    }

    #[test]
    fn test_tap_play_transport_failure_degrades() {
        let driver = MockDriver::new(1080, 1920).with_screen(menu_screen());
        let handle = driver.clone();
        let (_tmp, session) = session_with(driver);

        handle.fail_next("element_tap", 1);
        assert!(!session.main_menu().tap_play());
    }

    #[test]
    fn test_screen_info_summary() {
        let driver = MockDriver::new(1080, 1920).with_screen(menu_screen());
        let (_tmp, session) = session_with(driver);

        let info = session.main_menu().screen_info();
        assert_eq!(info.clickable_elements, 3);
        assert!(info.has_play_button);
        assert!(info.has_settings_button);
        assert_eq!(info.screen_size.unwrap().height, 1920);
    }
}
