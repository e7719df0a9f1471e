//! Coordinate gestures relative to live screen bounds.
//!
//! Every coordinate is computed from a freshly queried screen size at call
//! time — orientation or resolution may have changed since the last gesture,
//! so nothing about the screen is ever cached. Transport errors propagate to
//! the caller; a scenario decides whether to abort or degrade.

use crate::config::Timeouts;
use crate::driver::{ScreenSize, UiDriver};
use crate::fingerprint::{Fingerprinter, ScreenFingerprint};
use crate::result::TantearResult;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default swipe animation budget, in milliseconds
pub const DEFAULT_SWIPE_MS: u32 = 1000;

/// Screen-relative swipe directions.
///
/// Vertical swipes run along the horizontal center between 20% and 80% of
/// the height; horizontal swipes along the vertical center between 20% and
/// 80% of the width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// From 20% height down to 80% height
    Up,
    /// From 80% height up to 20% height
    Down,
    /// From 80% width to 20% width
    Left,
    /// From 20% width to 80% width
    Right,
}

impl SwipeDirection {
    /// Endpoint fractions `(from, to)` for this direction
    #[must_use]
    pub const fn endpoints(&self) -> ((f64, f64), (f64, f64)) {
        match self {
            Self::Up => ((0.5, 0.2), (0.5, 0.8)),
            Self::Down => ((0.5, 0.8), (0.5, 0.2)),
            Self::Left => ((0.8, 0.5), (0.2, 0.5)),
            Self::Right => ((0.2, 0.5), (0.8, 0.5)),
        }
    }
}

/// Outcome of one observed gesture.
///
/// Created per action and consumed immediately by the asserting scenario;
/// nothing here is persisted beyond the test run.
#[derive(Debug, Clone)]
pub struct ActionResult {
    /// Whether the gesture itself was delivered
    pub ok: bool,
    /// Wall-clock time the gesture took
    pub elapsed: Duration,
    /// Fingerprint captured after the gesture settled
    pub fingerprint: ScreenFingerprint,
}

/// Gesture issuer over a live driver session.
pub struct GestureDriver<'a> {
    driver: &'a dyn UiDriver,
    timeouts: Timeouts,
}

impl<'a> GestureDriver<'a> {
    /// Create a gesture driver borrowing the session's driver
    #[must_use]
    pub fn new(driver: &'a dyn UiDriver, timeouts: Timeouts) -> Self {
        Self { driver, timeouts }
    }

    /// Freshly queried screen bounds.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub fn screen_size(&self) -> TantearResult<ScreenSize> {
        self.driver.window_size()
    }

    /// Tap at absolute coordinates.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub fn tap(&self, x: i32, y: i32) -> TantearResult<()> {
        debug!(x, y, "tap");
        self.driver.tap(&[(x, y)])
    }

    /// Tap at screen fractions, returning the absolute point tapped.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub fn tap_at_fraction(&self, fx: f64, fy: f64) -> TantearResult<(i32, i32)> {
        let (x, y) = self.screen_size()?.at(fx, fy);
        self.tap(x, y)?;
        Ok((x, y))
    }

    /// Tap the center of the screen, returning the point tapped.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub fn tap_center(&self) -> TantearResult<(i32, i32)> {
        let (x, y) = self.screen_size()?.center();
        self.tap(x, y)?;
        Ok((x, y))
    }

    /// Swipe in a screen-relative direction with the default budget.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub fn swipe(&self, direction: SwipeDirection) -> TantearResult<()> {
        self.swipe_with_duration(direction, DEFAULT_SWIPE_MS)
    }

    /// Swipe in a screen-relative direction over `duration_ms`.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub fn swipe_with_duration(
        &self,
        direction: SwipeDirection,
        duration_ms: u32,
    ) -> TantearResult<()> {
        let size = self.screen_size()?;
        let (from, to) = direction.endpoints();
        let (x1, y1) = size.at(from.0, from.1);
        let (x2, y2) = size.at(to.0, to.1);
        debug!(?direction, x1, y1, x2, y2, duration_ms, "swipe");
        self.driver.swipe(x1, y1, x2, y2, duration_ms)
    }

    /// Swipe between absolute coordinates; `duration_ms` is the caller's
    /// animation budget, not negotiated.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub fn swipe_raw(
        &self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        duration_ms: u32,
    ) -> TantearResult<()> {
        debug!(x1, y1, x2, y2, duration_ms, "swipe");
        self.driver.swipe(x1, y1, x2, y2, duration_ms)
    }

    /// Tap each point in sequence with a settle delay between taps.
    ///
    /// The bridge cannot express true simultaneous multi-touch, so pinch and
    /// zoom gestures are emulated as ordered point sequences. Returns the
    /// number of points delivered.
    ///
    /// # Errors
    ///
    /// Propagates the transport error of the first failing tap.
    pub fn multi_point_sequence(&self, points: &[(i32, i32)]) -> TantearResult<usize> {
        for (delivered, &(x, y)) in points.iter().enumerate() {
            if let Err(err) = self.driver.tap(&[(x, y)]) {
                debug!(delivered, "multi-point sequence aborted");
                return Err(err);
            }
            std::thread::sleep(self.timeouts.gesture_settle);
        }
        Ok(points.len())
    }

    /// Run a gesture closure, timing it and fingerprinting the result.
    ///
    /// A gesture failure is folded into [`ActionResult::ok`] rather than
    /// propagated, so scenarios can count degraded interactions; only a
    /// failure to capture the after-fingerprint is an error.
    ///
    /// # Errors
    ///
    /// Propagates transport errors from the fingerprint capture.
    pub fn observe<F>(&self, fingerprinter: &Fingerprinter<'_>, act: F) -> TantearResult<ActionResult>
    where
        F: FnOnce(&Self) -> TantearResult<()>,
    {
        let started = Instant::now();
        let outcome = act(self);
        let elapsed = started.elapsed();
        if let Err(ref err) = outcome {
            debug!(error = %err, "observed gesture failed");
        }
        let fingerprint = fingerprinter.snapshot()?;
        Ok(ActionResult {
            ok: outcome.is_ok(),
            elapsed,
            fingerprint,
        })
    }
}

impl std::fmt::Debug for GestureDriver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureDriver")
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}
