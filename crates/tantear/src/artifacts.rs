//! Filesystem sink for screenshots, UI-tree dumps, and JSON reports.
//!
//! Every filename carries a timestamp, so nothing is ever overwritten and
//! concurrent-looking writes need no locks. There is no cleanup or
//! retention policy; the directory grows for the life of the test run.

use crate::driver::UiDriver;
use crate::result::TantearResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// A JSON test report artifact: `{test_name, timestamp, results}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    /// Name of the test that produced the report
    pub test_name: String,
    /// Human-readable timestamp (`%Y%m%d_%H%M%S`)
    pub timestamp: String,
    /// Arbitrary result payload chosen by the scenario
    pub results: serde_json::Value,
}

/// Writer for timestamped test artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactSink {
    dir: PathBuf,
}

impl ArtifactSink {
    /// Create the sink, creating the artifact directory if needed.
    ///
    /// # Errors
    ///
    /// Propagates directory-creation failures.
    pub fn new(dir: impl Into<PathBuf>) -> TantearResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory receiving the artifacts
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write PNG bytes as `<name>_<unix-timestamp>.png`.
    ///
    /// # Errors
    ///
    /// Propagates filesystem failures.
    pub fn save_screenshot(&self, name: &str, png: &[u8]) -> TantearResult<PathBuf> {
        let path = self.dir.join(format!("{name}_{}.png", unix_stamp()));
        std::fs::write(&path, png)?;
        debug!(path = %path.display(), bytes = png.len(), "screenshot saved");
        Ok(path)
    }

    /// Write a serialized UI tree as `<name>_<unix-timestamp>.xml`.
    ///
    /// # Errors
    ///
    /// Propagates filesystem failures.
    pub fn save_ui_tree(&self, name: &str, xml: &str) -> TantearResult<PathBuf> {
        let path = self.dir.join(format!("{name}_{}.xml", unix_stamp()));
        std::fs::write(&path, xml)?;
        debug!(path = %path.display(), bytes = xml.len(), "ui tree saved");
        Ok(path)
    }

    /// Write a JSON report as `test_report_<test_name>_<datetime>.json`.
    ///
    /// # Errors
    ///
    /// Propagates serialization and filesystem failures.
    pub fn save_report(
        &self,
        test_name: &str,
        results: serde_json::Value,
    ) -> TantearResult<PathBuf> {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let report = TestReport {
            test_name: test_name.to_string(),
            timestamp: timestamp.clone(),
            results,
        };
        let path = self
            .dir
            .join(format!("test_report_{test_name}_{timestamp}.json"));
        std::fs::write(&path, serde_json::to_vec_pretty(&report)?)?;
        debug!(path = %path.display(), "report saved");
        Ok(path)
    }

    /// Capture the current screen and save it under `name`.
    ///
    /// # Errors
    ///
    /// Propagates transport and filesystem failures.
    pub fn grab(&self, driver: &dyn UiDriver, name: &str) -> TantearResult<PathBuf> {
        let png = driver.screenshot_png()?;
        self.save_screenshot(name, &png)
    }

    /// Best-effort screenshot of a failing test, named
    /// `FAILED_<test-name>_<unix-timestamp>.png`.
    ///
    /// A capture or write failure is logged and swallowed — the failure
    /// screenshot must never mask the original test failure.
    pub fn capture_failure(&self, driver: &dyn UiDriver, test_name: &str) -> Option<PathBuf> {
        let png = match driver.screenshot_png() {
            Ok(png) => png,
            Err(err) => {
                warn!(test_name, error = %err, "failure screenshot capture failed");
                return None;
            }
        };
        match self.save_screenshot(&format!("FAILED_{test_name}"), &png) {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(test_name, error = %err, "failure screenshot write failed");
                None
            }
        }
    }
}

fn unix_stamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockScreen};

    fn sink() -> (tempfile::TempDir, ArtifactSink) {
        let dir = tempfile::tempdir().unwrap();
        let sink = ArtifactSink::new(dir.path().join("reports")).unwrap();
        (dir, sink)
    }

    #[test]
    fn test_screenshot_filename_shape() {
        let (_tmp, sink) = sink();
        let path = sink.save_screenshot("before_tap", &[1, 2, 3]).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("before_tap_"));
        assert!(name.ends_with(".png"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_ui_tree_filename_shape() {
        let (_tmp, sink) = sink();
        let path = sink.save_ui_tree("menu_dump", "<hierarchy/>").unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("menu_dump_"));
        assert!(name.ends_with(".xml"));
    }

    #[test]
    fn test_report_roundtrip() {
        let (_tmp, sink) = sink();
        let path = sink
            .save_report(
                "launch_check",
                serde_json::json!({"taps": 3, "stable": true}),
            )
            .unwrap();
        let report: TestReport =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(report.test_name, "launch_check");
        assert_eq!(report.results["taps"], 3);
        assert!(!report.timestamp.is_empty());
    }

    #[test]
    fn test_failure_capture_is_best_effort() {
        let (_tmp, sink) = sink();
        let driver = MockDriver::new(1080, 1920).with_screen(MockScreen::named("menu"));

        let path = sink.capture_failure(&driver, "tap_play").unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("FAILED_tap_play_"));

        // A dead transport degrades to None instead of panicking or erroring
        driver.fail_next("screenshot", 1);
        assert!(sink.capture_failure(&driver, "tap_play").is_none());
    }

    #[test]
    fn test_grab_uses_driver_screenshot() {
        let (_tmp, sink) = sink();
        let driver = MockDriver::new(1080, 1920).with_screen(MockScreen::named("menu"));
        let path = sink.grab(&driver, "after_swipe").unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
