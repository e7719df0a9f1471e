//! Scoped driver session.
//!
//! One session is exclusively owned by the currently executing test:
//! acquired at test start, released on drop regardless of outcome — the
//! RAII discipline guarantees the device is freed on both pass and failure
//! paths, including on assertion panic. There is no process-wide driver
//! singleton; every component borrows the session's driver explicitly.

use crate::artifacts::ArtifactSink;
use crate::config::HarnessConfig;
use crate::driver::UiDriver;
use crate::fingerprint::Fingerprinter;
use crate::gesture::GestureDriver;
use crate::locator::LocatorResolver;
use crate::pages::{GameBoardPage, LevelMapPage, MainMenuPage};
use crate::result::TantearResult;
use std::path::PathBuf;
use tracing::{info, warn};

/// A live, exclusively-owned driver session.
pub struct Session {
    driver: Box<dyn UiDriver>,
    config: HarnessConfig,
    sink: ArtifactSink,
}

impl Session {
    /// Acquire a session over an established driver connection.
    ///
    /// Creates the artifact directory and performs the configured launch
    /// settle wait before handing the session to the test.
    ///
    /// # Errors
    ///
    /// Propagates artifact-directory creation failures.
    pub fn start(driver: Box<dyn UiDriver>, config: HarnessConfig) -> TantearResult<Self> {
        let sink = ArtifactSink::new(config.report_dir.clone())?;
        info!(
            app = %config.session.app_package,
            server = %config.session.server_url,
            "session acquired"
        );
        if !config.timeouts.launch_wait.is_zero() {
            std::thread::sleep(config.timeouts.launch_wait);
        }
        Ok(Self {
            driver,
            config,
            sink,
        })
    }

    /// The raw driver boundary
    #[must_use]
    pub fn driver(&self) -> &dyn UiDriver {
        self.driver.as_ref()
    }

    /// Harness configuration
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Artifact sink for this session
    #[must_use]
    pub fn sink(&self) -> &ArtifactSink {
        &self.sink
    }

    /// Locator resolver over this session's driver
    #[must_use]
    pub fn resolver(&self) -> LocatorResolver<'_> {
        LocatorResolver::new(self.driver.as_ref(), self.config.timeouts.clone())
    }

    /// Gesture driver over this session's driver
    #[must_use]
    pub fn gestures(&self) -> GestureDriver<'_> {
        GestureDriver::new(self.driver.as_ref(), self.config.timeouts.clone())
    }

    /// Fingerprinter over this session's driver
    #[must_use]
    pub fn fingerprinter(&self) -> Fingerprinter<'_> {
        Fingerprinter::new(self.driver.as_ref(), self.config.timeouts.poll_interval)
    }

    /// Main menu page object
    #[must_use]
    pub fn main_menu(&self) -> MainMenuPage<'_> {
        MainMenuPage::new(self)
    }

    /// Level map page object
    #[must_use]
    pub fn level_map(&self) -> LevelMapPage<'_> {
        LevelMapPage::new(self)
    }

    /// Game board page object
    #[must_use]
    pub fn game_board(&self) -> GameBoardPage<'_> {
        GameBoardPage::new(self)
    }

    /// Best-effort failure screenshot for `test_name`; never escalates.
    pub fn capture_failure(&self, test_name: &str) -> Option<PathBuf> {
        self.sink.capture_failure(self.driver.as_ref(), test_name)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        match self.driver.quit() {
            Ok(()) => info!("session released"),
            Err(err) => warn!(error = %err, "session release failed"),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timeouts;
    use crate::mock::{MockDriver, MockScreen};
    use std::time::Duration;

    fn test_config(dir: &std::path::Path) -> HarnessConfig {
        HarnessConfig::default()
            .with_report_dir(dir.join("reports"))
            .with_timeouts(
                Timeouts::default()
                    .with_launch_wait(Duration::ZERO)
                    .with_element_wait(Duration::from_millis(20))
                    .with_poll_interval(Duration::from_millis(1)),
            )
    }

    #[test]
    fn test_drop_releases_driver_once() {
        let tmp = tempfile::tempdir().unwrap();
        let driver = MockDriver::new(1080, 1920).with_screen(MockScreen::named("menu"));
        let handle = driver.clone();
        {
            let session = Session::start(Box::new(driver), test_config(tmp.path())).unwrap();
            assert_eq!(session.gestures().screen_size().unwrap().width, 1080);
        }
        assert_eq!(handle.quit_count(), 1);
    }

    #[test]
    fn test_release_survives_quit_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let driver = MockDriver::new(1080, 1920).with_screen(MockScreen::named("menu"));
        let handle = driver.clone();
        handle.fail_next("quit", 1);
        {
            let _session = Session::start(Box::new(driver), test_config(tmp.path())).unwrap();
        }
        // Quit was attempted and its failure degraded to a warning
        assert_eq!(handle.quit_count(), 1);
    }

    #[test]
    fn test_failure_capture_writes_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let driver = MockDriver::new(1080, 1920).with_screen(MockScreen::named("menu"));
        let session = Session::start(Box::new(driver), test_config(tmp.path())).unwrap();
        let path = session.capture_failure("tap_play").unwrap();
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("FAILED_tap_play_"));
    }
}
