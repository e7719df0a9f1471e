//! Remote automation bridge boundary.
//!
//! The automation server, device bridge, and wire protocol are external
//! collaborators. Tantear consumes them only through the [`UiDriver`] trait:
//! a synchronous, blocking capability surface mirroring what a mobile
//! automation bridge exposes (find elements by strategy, tap, swipe,
//! screenshot, UI-tree serialization, orientation, backgrounding).
//!
//! Elements come back as [`UiElement`] trait objects: opaque handles valid
//! only until the next action, since the UI tree may be rebuilt at any time.

use crate::locator::LocatorStrategy;
use crate::result::TantearResult;
use serde::{Deserialize, Serialize};

/// Screen dimensions in device pixels, freshly queried per use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ScreenSize {
    /// Create a new screen size
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Center point of the screen
    #[must_use]
    pub const fn center(&self) -> (i32, i32) {
        (self.width as i32 / 2, self.height as i32 / 2)
    }

    /// Point at the given width/height fractions (0.0..=1.0)
    #[must_use]
    pub fn at(&self, fx: f64, fy: f64) -> (i32, i32) {
        (
            (f64::from(self.width) * fx) as i32,
            (f64::from(self.height) * fy) as i32,
        )
    }

    /// Whether height exceeds width
    #[must_use]
    pub const fn is_portrait(&self) -> bool {
        self.height > self.width
    }
}

/// Device orientation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Height exceeds width
    #[default]
    Portrait,
    /// Width exceeds height
    Landscape,
}

impl Orientation {
    /// Bridge wire name for this orientation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "PORTRAIT",
            Self::Landscape => "LANDSCAPE",
        }
    }

    /// The other orientation
    #[must_use]
    pub const fn flipped(&self) -> Self {
        match self {
            Self::Portrait => Self::Landscape,
            Self::Landscape => Self::Portrait,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attribute snapshot of one UI node, for debug listings and reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementInfo {
    /// Position of the element in the listing
    pub index: usize,
    /// `text` attribute
    pub text: String,
    /// `content-desc` attribute
    pub content_desc: String,
    /// `resource-id` attribute
    pub resource_id: String,
    /// `class` attribute
    pub class_name: String,
    /// `bounds` attribute as reported by the bridge
    pub bounds: String,
}

/// Capability handle for one matched UI node.
///
/// Handles are valid only for the action that produced them; never cache
/// one across gestures, since the underlying tree may have been rebuilt.
pub trait UiElement {
    /// Look up an attribute by its bridge name (`text`, `content-desc`,
    /// `resource-id`, `class`, `bounds`, `clickable`, ...). `None` when the
    /// node does not carry the attribute.
    fn attr(&self, name: &str) -> Option<String>;

    /// Tap the element.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the tap could not be delivered.
    fn tap(&self) -> TantearResult<()>;

    /// Convenience accessor for the `text` attribute
    fn text(&self) -> Option<String> {
        self.attr("text")
    }

    /// Snapshot the node's common attributes
    fn info(&self, index: usize) -> ElementInfo {
        ElementInfo {
            index,
            text: self.attr("text").unwrap_or_default(),
            content_desc: self.attr("content-desc").unwrap_or_default(),
            resource_id: self.attr("resource-id").unwrap_or_default(),
            class_name: self.attr("class").unwrap_or_default(),
            bounds: self.attr("bounds").unwrap_or_default(),
        }
    }
}

/// Synchronous remote-driver capability surface.
///
/// Every call blocks until the transport responds or its own timeout fires;
/// there is no event channel from the remote side. One driver session is
/// exclusively owned by the currently executing test.
pub trait UiDriver {
    /// Query the live UI tree once with a single strategy.
    ///
    /// An empty vector means "no match right now"; polling and fallback
    /// ordering are the resolver's job, not the driver's.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the query itself failed.
    fn find_elements(&self, strategy: &LocatorStrategy) -> TantearResult<Vec<Box<dyn UiElement>>>;

    /// Tap each point in sequence.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the gesture could not be delivered.
    fn tap(&self, points: &[(i32, i32)]) -> TantearResult<()>;

    /// Swipe from one point to another over `duration_ms`.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the gesture could not be delivered.
    fn swipe(&self, x1: i32, y1: i32, x2: i32, y2: i32, duration_ms: u32) -> TantearResult<()>;

    /// Current screen dimensions.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the device did not respond.
    fn window_size(&self) -> TantearResult<ScreenSize>;

    /// Capture the screen as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns a transport error if capture failed.
    fn screenshot_png(&self) -> TantearResult<Vec<u8>>;

    /// Serialized UI tree (XML) for the current screen.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the dump failed.
    fn page_source(&self) -> TantearResult<String>;

    /// Current device orientation.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the device did not respond.
    fn orientation(&self) -> TantearResult<Orientation>;

    /// Request an orientation change.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TantearError::OrientationLocked`] when the app or
    /// system refuses the rotation, or a transport error.
    fn set_orientation(&self, orientation: Orientation) -> TantearResult<()>;

    /// Send the app to the background for `seconds`, then restore it.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the app could not be backgrounded.
    fn background_app(&self, seconds: u32) -> TantearResult<()>;

    /// End the session and release the device.
    ///
    /// # Errors
    ///
    /// Returns a transport error if teardown failed; callers on cleanup
    /// paths degrade this to a warning.
    fn quit(&self) -> TantearResult<()>;
}
