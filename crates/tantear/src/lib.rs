//! Tantear: black-box UI test harness for mobile games.
//!
//! Tantear (Spanish: "to feel out / probe") drives a game through a remote
//! automation bridge — locate elements, tap, swipe, screenshot — and asserts
//! on responsiveness, stability, and crude visual properties. There is no
//! game-logic modeling and no real image recognition: every verdict is a
//! heuristic threshold over screen geometry, pixel samples, or response
//! latency.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Test Scenario                             │
//! │        act ──────────► observe ──────────► assert              │
//! ├──────────────┬──────────────────┬──────────────────────────────┤
//! │ GestureDriver│  Fingerprinter   │  Color classifier            │
//! │ (tap/swipe)  │  (tree digest,   │  (pixel samples, hue bands,  │
//! │              │   size bands)    │   dominant buckets)          │
//! ├──────────────┴──────────────────┴──────────────────────────────┤
//! │ Page objects ── LocatorResolver (ordered fallback strategies)  │
//! ├────────────────────────────────────────────────────────────────┤
//! │ UiDriver trait  ◄── remote automation bridge (external)        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is synchronous and blocking: waits are bounded poll loops,
//! one driver session is exclusively owned per test, and the session is
//! released on drop regardless of outcome.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

pub mod artifacts;
pub mod color;
pub mod config;
pub mod driver;
pub mod extract;
pub mod fingerprint;
pub mod gesture;
pub mod locator;
pub mod mock;
pub mod pages;
pub mod result;
pub mod session;

pub use artifacts::{ArtifactSink, TestReport};
pub use color::{
    classify, classify_samples, consistency_ratio, dominant_colors, flexible_bands,
    has_colorful_content, matches_hue_bands, png_dimensions, samples_from_png, ColorClass,
    ColorPolicy, ColorSample, HueBand, SampleClassification,
};
pub use config::{HarnessConfig, SessionConfig, Timeouts};
pub use driver::{ElementInfo, Orientation, ScreenSize, UiDriver, UiElement};
pub use extract::extract_int;
pub use fingerprint::{
    changed, consistency, stable, variation_ratio, Consistency, Fingerprinter, ScreenFingerprint,
    StabilityPolicy,
};
pub use gesture::{ActionResult, GestureDriver, SwipeDirection, DEFAULT_SWIPE_MS};
pub use locator::{LocatorResolver, LocatorStrategy, SelectorKind, Target, CLICKABLE_XPATH};
pub use pages::{BoardInfo, GameBoardPage, LevelMapPage, MainMenuPage, MapInfo, MenuInfo};
pub use result::{TantearError, TantearResult};
pub use session::Session;
