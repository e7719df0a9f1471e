//! Harness configuration.
//!
//! Every heuristic threshold in the harness is a named configuration value
//! so that scenarios can tighten or loosen policy without touching logic.
//! Session-establishment settings ([`SessionConfig`]) describe the app under
//! test and the bridge endpoint; they are consumed by whatever launches the
//! real session, not by the core components.

use crate::color::ColorPolicy;
use crate::fingerprint::StabilityPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Wait budgets for polling operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeouts {
    /// Per-strategy wait while resolving a locator target
    pub element_wait: Duration,
    /// Settle wait after session start, before the first query
    pub launch_wait: Duration,
    /// Interval between polls of the live UI tree
    pub poll_interval: Duration,
    /// Settle delay between the taps of a multi-point sequence
    pub gesture_settle: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            element_wait: Duration::from_secs(3),
            launch_wait: Duration::from_secs(10),
            poll_interval: Duration::from_millis(50),
            gesture_settle: Duration::from_millis(100),
        }
    }
}

impl Timeouts {
    /// Set the per-strategy element wait
    #[must_use]
    pub const fn with_element_wait(mut self, wait: Duration) -> Self {
        self.element_wait = wait;
        self
    }

    /// Set the launch settle wait
    #[must_use]
    pub const fn with_launch_wait(mut self, wait: Duration) -> Self {
        self.launch_wait = wait;
        self
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the multi-point settle delay
    #[must_use]
    pub const fn with_gesture_settle(mut self, settle: Duration) -> Self {
        self.gesture_settle = settle;
        self
    }
}

/// App identity and bridge endpoint for session establishment.
///
/// Consumed outside the core: the process that owns the automation server
/// and device bridge turns this into a live [`crate::driver::UiDriver`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Target platform name
    pub platform_name: String,
    /// Bridge automation backend
    pub automation_name: String,
    /// Package identifier of the app under test
    pub app_package: String,
    /// Launch activity of the app under test
    pub app_activity: String,
    /// Automation server URL
    pub server_url: String,
    /// Idle command timeout granted to the bridge, in seconds
    pub new_command_timeout_secs: u64,
    /// Keep app state between sessions
    pub no_reset: bool,
    /// Wipe app state before the session
    pub full_reset: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            platform_name: String::from("Android"),
            automation_name: String::from("UiAutomator2"),
            app_package: String::from("com.example.game"),
            app_activity: String::from(".MainActivity"),
            server_url: String::from("http://localhost:4723"),
            new_command_timeout_secs: 300,
            no_reset: true,
            full_reset: false,
        }
    }
}

impl SessionConfig {
    /// Set the app package and activity
    #[must_use]
    pub fn with_app(mut self, package: impl Into<String>, activity: impl Into<String>) -> Self {
        self.app_package = package.into();
        self.app_activity = activity.into();
        self
    }

    /// Set the automation server URL
    #[must_use]
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }
}

/// Aggregate configuration handed to [`crate::session::Session`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Session establishment settings
    pub session: SessionConfig,
    /// Wait budgets
    pub timeouts: Timeouts,
    /// Screen-stability classification bands
    pub stability: StabilityPolicy,
    /// Color classification thresholds
    pub color: ColorPolicy,
    /// Directory receiving screenshots, UI dumps, and reports
    pub report_dir: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            timeouts: Timeouts::default(),
            stability: StabilityPolicy::default(),
            color: ColorPolicy::default(),
            report_dir: PathBuf::from("reports"),
        }
    }
}

impl HarnessConfig {
    /// Set the artifact directory
    #[must_use]
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    /// Set the wait budgets
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the stability policy
    #[must_use]
    pub fn with_stability(mut self, stability: StabilityPolicy) -> Self {
        self.stability = stability;
        self
    }

    /// Set the color policy
    #[must_use]
    pub fn with_color(mut self, color: ColorPolicy) -> Self {
        self.color = color;
        self
    }
}
