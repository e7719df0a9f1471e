//! Game board page object.

use super::tap_quietly;
use crate::driver::UiElement;
use crate::extract::extract_int;
use crate::locator::{LocatorStrategy, Target};
use crate::result::TantearResult;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Horizontal travel of a board move swipe, in pixels from center
const MOVE_SWIPE_HALF_SPAN: i32 = 50;

/// Animation budget for a board move swipe
const MOVE_SWIPE_MS: u32 = 500;

/// Debug summary of the game board state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardInfo {
    /// Whether a board container resolved
    pub has_game_board: bool,
    /// Whether a moves counter resolved
    pub has_moves_counter: bool,
    /// Whether a score display resolved
    pub has_score: bool,
    /// Parsed remaining moves, when readable
    pub moves_count: Option<i64>,
    /// Parsed score, when readable
    pub current_score: Option<i64>,
    /// Number of clickable elements visible
    pub clickable_elements: usize,
}

/// The in-level game board.
pub struct GameBoardPage<'a> {
    session: &'a Session,
}

impl<'a> GameBoardPage<'a> {
    /// Create the page over a live session
    #[must_use]
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn board() -> Target {
        Target::named("game board")
            .or(LocatorStrategy::xpath(
                "//*[contains(@resource-id, 'game') or contains(@resource-id, 'board')]",
            ))
            .or(LocatorStrategy::xpath(
                "//*[contains(@class, 'game') or contains(@class, 'board')]",
            ))
            .or(LocatorStrategy::xpath(
                "//*[contains(@content-desc, 'game') or contains(@content-desc, 'board')]",
            ))
    }

    fn moves_counter() -> Target {
        Target::named("moves counter")
            .or(LocatorStrategy::xpath(
                "//*[contains(@text, 'Moves') or contains(@text, 'moves')]",
            ))
            .or(LocatorStrategy::xpath("//*[contains(@resource-id, 'moves')]"))
            .or(LocatorStrategy::xpath(
                "//*[contains(@content-desc, 'moves')]",
            ))
    }

    fn score_display() -> Target {
        Target::named("score display")
            .or(LocatorStrategy::xpath(
                "//*[contains(@text, 'Score') or contains(@text, 'score')]",
            ))
            .or(LocatorStrategy::xpath("//*[contains(@resource-id, 'score')]"))
            .or(LocatorStrategy::xpath(
                "//*[contains(@content-desc, 'score')]",
            ))
    }

    fn pause_button() -> Target {
        Target::named("pause button")
            .or(LocatorStrategy::xpath(
                "//*[contains(@content-desc, 'pause') or contains(@content-desc, 'Pause')]",
            ))
            .or(LocatorStrategy::xpath("//*[contains(@text, 'Pause')]"))
            .or(LocatorStrategy::xpath("//*[contains(@resource-id, 'pause')]"))
    }

    /// Resolve the board container through its fallback list
    #[must_use]
    pub fn find_game_board(&self) -> Option<Box<dyn UiElement>> {
        self.session.resolver().resolve(&Self::board())
    }

    /// Resolve the moves counter through its fallback list
    #[must_use]
    pub fn find_moves_counter(&self) -> Option<Box<dyn UiElement>> {
        self.session.resolver().resolve(&Self::moves_counter())
    }

    /// Resolve the score display through its fallback list
    #[must_use]
    pub fn find_score(&self) -> Option<Box<dyn UiElement>> {
        self.session.resolver().resolve(&Self::score_display())
    }

    /// Whether the board appears on screen: any of the board container,
    /// moves counter, or score display.
    #[must_use]
    pub fn is_displayed(&self) -> bool {
        self.find_game_board().is_some()
            || self.find_moves_counter().is_some()
            || self.find_score().is_some()
    }

    /// Remaining moves parsed from the counter's text, when readable.
    #[must_use]
    pub fn moves_count(&self) -> Option<i64> {
        let element = self.find_moves_counter()?;
        let text = element.text()?;
        let moves = extract_int(&text);
        debug!(text = %text, ?moves, "moves counter read");
        moves
    }

    /// Current score parsed from the display's text, when readable.
    #[must_use]
    pub fn score(&self) -> Option<i64> {
        let element = self.find_score()?;
        let text = element.text()?;
        let score = extract_int(&text);
        debug!(text = %text, ?score, "score read");
        score
    }

    /// Attempt a move: a short horizontal swipe across the screen center,
    /// where the board is assumed to sit.
    ///
    /// # Errors
    ///
    /// Propagates transport errors from the swipe.
    pub fn make_move(&self) -> TantearResult<()> {
        let gestures = self.session.gestures();
        let (cx, cy) = gestures.screen_size()?.center();
        gestures.swipe_raw(
            cx - MOVE_SWIPE_HALF_SPAN,
            cy,
            cx + MOVE_SWIPE_HALF_SPAN,
            cy,
            MOVE_SWIPE_MS,
        )
    }

    /// Tap the pause button, trying each fallback strategy until one both
    /// resolves and responds; `false` when all are exhausted.
    #[must_use]
    pub fn tap_pause(&self) -> bool {
        let resolver = self.session.resolver();
        let per_strategy = self.session.config().timeouts.element_wait;
        for strategy in Self::pause_button().strategies() {
            if let Some(button) = resolver.resolve_strategy(strategy, per_strategy) {
                if tap_quietly(button.as_ref(), "pause button") {
                    return true;
                }
            }
        }
        false
    }

    /// Collect a debug summary of the board state
    #[must_use]
    pub fn state_info(&self) -> BoardInfo {
        BoardInfo {
            has_game_board: self.find_game_board().is_some(),
            has_moves_counter: self.find_moves_counter().is_some(),
            has_score: self.find_score().is_some(),
            moves_count: self.moves_count(),
            current_score: self.score(),
            clickable_elements: self.session.resolver().clickable_elements().len(),
        }
    }
}
