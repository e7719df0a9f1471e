//! Shared scenario fixtures: a scripted device with the game's three
//! screens and a harness config tuned for unit-time runs.

// Each scenario binary pulls in the subset of fixtures it needs.
#![allow(dead_code)]

use std::time::Duration;
use tantear::mock::{striped_png, MockDriver, MockNode, MockScreen};
use tantear::{HarnessConfig, Session, Timeouts};

/// Rose / blue / gold / green / violet — the palette painted across every
/// scripted screenshot so the five-point sample grid lands on game colors.
pub const PALETTE: [(u8, u8, u8); 5] = [
    (255, 100, 150),
    (100, 150, 255),
    (255, 200, 100),
    (100, 220, 120),
    (160, 100, 220),
];

pub fn colorful_shot() -> Vec<u8> {
    striped_png(1080, 1920, &PALETTE)
}

fn filler(tag: &str) -> String {
    // Scripted trees are padded so content-size checks see a realistic app
    format!(
        "<hierarchy screen='{tag}'>{}</hierarchy>",
        format!("<node screen='{tag}' filler='x'/>").repeat(64)
    )
}

pub fn menu_screen() -> MockScreen {
    MockScreen::named("menu")
        .with_source(filler("menu"))
        .with_shot(colorful_shot())
        .with_node(MockNode::new().with_attr("text", "Play").clickable())
        .with_node(
            MockNode::new()
                .with_attr("content-desc", "Settings")
                .clickable(),
        )
        .with_node(MockNode::new().with_attr("content-desc", "Shop").clickable())
}

pub fn map_screen() -> MockScreen {
    MockScreen::named("map")
        .with_source(filler("map"))
        .with_shot(striped_png(1080, 1920, &PALETTE[1..]))
        .with_node(
            MockNode::new()
                .with_attr("content-desc", "Level 1")
                .clickable(),
        )
        .with_node(
            MockNode::new()
                .with_attr("content-desc", "Level 2")
                .clickable(),
        )
        .with_node(MockNode::new().with_attr("text", "Back").clickable())
}

pub fn board_screen() -> MockScreen {
    MockScreen::named("board")
        .with_source(filler("board"))
        .with_shot(striped_png(1080, 1920, &PALETTE[..4]))
        .with_node(MockNode::new().with_attr("resource-id", "com.example:id/game_board"))
        .with_node(MockNode::new().with_attr("text", "Moves: 24"))
        .with_node(MockNode::new().with_attr("text", "Score: 12,450 / Best: 99,000"))
        .with_node(
            MockNode::new()
                .with_attr("content-desc", "pause")
                .clickable(),
        )
}

pub fn fast_config(dir: &std::path::Path) -> HarnessConfig {
    HarnessConfig::default()
        .with_report_dir(dir.join("reports"))
        .with_timeouts(
            Timeouts::default()
                .with_launch_wait(Duration::ZERO)
                .with_element_wait(Duration::from_millis(20))
                .with_poll_interval(Duration::from_millis(1))
                .with_gesture_settle(Duration::ZERO),
        )
}

/// Start a session over a device scripted with the given screens.
///
/// Returns the temp dir keeping artifacts alive, a handle onto the mock for
/// journal assertions, and the session itself.
pub fn start(screens: Vec<MockScreen>) -> (tempfile::TempDir, MockDriver, Session) {
    let tmp = tempfile::tempdir().unwrap();
    let mut driver = MockDriver::new(1080, 1920);
    for screen in screens {
        driver = driver.with_screen(screen);
    }
    let handle = driver.clone();
    let session = Session::start(Box::new(driver), fast_config(tmp.path())).unwrap();
    (tmp, handle, session)
}

/// The full three-screen game script: menu, level map, board.
pub fn game_script() -> Vec<MockScreen> {
    vec![menu_screen(), map_screen(), board_screen()]
}
