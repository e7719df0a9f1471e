//! Page objects for the game's principal screens.
//!
//! Each page declares its logical targets once, as ordered fallback
//! strategy lists, and exposes intent-level operations (tap play, read the
//! score) built on the resolver and gesture driver. Pages borrow the
//! session; they own no driver state and cache no elements.

mod game_board;
mod level_map;
mod main_menu;

pub use game_board::{BoardInfo, GameBoardPage};
pub use level_map::{LevelMapPage, MapInfo};
pub use main_menu::{MainMenuPage, MenuInfo};

use crate::driver::UiElement;
use tracing::warn;

/// Tap an element, degrading a transport failure to `false` with a warning.
///
/// Page-level taps report success as a boolean because the original intent
/// ("did the button respond") is a scenario observation, not an invariant.
pub(crate) fn tap_quietly(element: &dyn UiElement, what: &str) -> bool {
    match element.tap() {
        Ok(()) => true,
        Err(err) => {
            warn!(what, error = %err, "tap failed");
            false
        }
    }
}
