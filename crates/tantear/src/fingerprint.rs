//! Screen-state fingerprinting and comparison.
//!
//! A fingerprint is a lightweight, non-structural summary of UI state:
//! serialized-tree length and digest, screen dimensions, and raw screenshot
//! byte size. Fingerprints are compared for equality or near-equality only —
//! never diffed structurally.
//!
//! `changed` is intentionally coarse: any churn in the serialized tree
//! (whitespace, timestamps) counts as a change, so callers must read a
//! "changed" verdict as *possibly* changed, not as proof of semantic
//! difference. `stable` checks dimension identity, which is the cheap
//! crash/resize detector used after interaction bursts.

use crate::driver::UiDriver;
use crate::result::TantearResult;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};
use tracing::debug;

/// Classification bands for screenshot byte-size variation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StabilityPolicy {
    /// Variation ratio below which a screenshot series is stable
    pub stable_limit: f64,
    /// Variation ratio below which the series is still tolerable
    pub tolerable_limit: f64,
}

impl Default for StabilityPolicy {
    fn default() -> Self {
        Self {
            stable_limit: 0.10,
            tolerable_limit: 0.25,
        }
    }
}

impl StabilityPolicy {
    /// Set the stable band limit
    #[must_use]
    pub const fn with_stable_limit(mut self, limit: f64) -> Self {
        self.stable_limit = limit;
        self
    }

    /// Set the tolerable band limit
    #[must_use]
    pub const fn with_tolerable_limit(mut self, limit: f64) -> Self {
        self.tolerable_limit = limit;
        self
    }
}

/// Verdict over a series of near-duplicate screenshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Consistency {
    /// Variation within the stable band
    Stable,
    /// Variation above stable but within the tolerable band
    Tolerable,
    /// Variation beyond both bands
    Unstable,
}

impl Consistency {
    /// Whether this verdict is acceptable for a stability assertion
    #[must_use]
    pub const fn is_acceptable(&self) -> bool {
        !matches!(self, Self::Unstable)
    }
}

/// Point-in-time summary of UI state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenFingerprint {
    /// Length of the serialized UI tree, in bytes
    pub source_len: usize,
    /// SHA-256 digest of the serialized UI tree
    pub source_digest: [u8; 32],
    /// Screen width at capture time
    pub width: u32,
    /// Screen height at capture time
    pub height: u32,
    /// Raw screenshot size in bytes
    pub shot_bytes: usize,
}

/// True when the serialized tree differs between the two fingerprints.
///
/// Byte-level inequality: digest or length mismatch. Coarse by design.
#[must_use]
pub fn changed(before: &ScreenFingerprint, after: &ScreenFingerprint) -> bool {
    before.source_digest != after.source_digest || before.source_len != after.source_len
}

/// True when screen dimensions are identical between the two fingerprints.
#[must_use]
pub fn stable(before: &ScreenFingerprint, after: &ScreenFingerprint) -> bool {
    before.width == after.width && before.height == after.height
}

/// Variation ratio `(max - min) / mean` over raw byte counts.
///
/// Zero for an empty or single-element series.
#[must_use]
pub fn variation_ratio(sizes: &[usize]) -> f64 {
    if sizes.len() < 2 {
        return 0.0;
    }
    let max = *sizes.iter().max().unwrap_or(&0);
    let min = *sizes.iter().min().unwrap_or(&0);
    let mean = sizes.iter().sum::<usize>() as f64 / sizes.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }
    (max - min) as f64 / mean
}

/// Classify a screenshot series against the policy bands.
#[must_use]
pub fn consistency(sizes: &[usize], policy: &StabilityPolicy) -> Consistency {
    let ratio = variation_ratio(sizes);
    if ratio < policy.stable_limit {
        Consistency::Stable
    } else if ratio < policy.tolerable_limit {
        Consistency::Tolerable
    } else {
        Consistency::Unstable
    }
}

/// Captures fingerprints from a live driver session.
pub struct Fingerprinter<'a> {
    driver: &'a dyn UiDriver,
    poll_interval: Duration,
}

impl<'a> Fingerprinter<'a> {
    /// Create a fingerprinter borrowing the session's driver
    #[must_use]
    pub fn new(driver: &'a dyn UiDriver, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    /// Capture a fingerprint of the current UI state.
    ///
    /// # Errors
    ///
    /// Propagates transport errors from any of the three underlying queries.
    pub fn snapshot(&self) -> TantearResult<ScreenFingerprint> {
        let source = self.driver.page_source()?;
        let size = self.driver.window_size()?;
        let shot = self.driver.screenshot_png()?;
        let fingerprint = ScreenFingerprint {
            source_len: source.len(),
            source_digest: Sha256::digest(source.as_bytes()).into(),
            width: size.width,
            height: size.height,
            shot_bytes: shot.len(),
        };
        debug!(
            source_len = fingerprint.source_len,
            width = fingerprint.width,
            height = fingerprint.height,
            shot_bytes = fingerprint.shot_bytes,
            "fingerprint captured"
        );
        Ok(fingerprint)
    }

    /// Poll the serialized tree until it differs from `before`, or until
    /// `timeout`. Returns `true` once a change is observed.
    ///
    /// # Errors
    ///
    /// Propagates transport errors from the tree dump.
    pub fn wait_for_change(
        &self,
        before: &ScreenFingerprint,
        timeout: Duration,
    ) -> TantearResult<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            let source = self.driver.page_source()?;
            let digest: [u8; 32] = Sha256::digest(source.as_bytes()).into();
            if digest != before.source_digest || source.len() != before.source_len {
                debug!("screen changed");
                return Ok(true);
            }
            if Instant::now() >= deadline {
                debug!("screen unchanged at timeout");
                return Ok(false);
            }
            std::thread::sleep(self.poll_interval);
        }
    }
}

impl std::fmt::Debug for Fingerprinter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fingerprinter")
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint_of(source: &str, width: u32, height: u32, shot_bytes: usize) -> ScreenFingerprint {
        ScreenFingerprint {
            source_len: source.len(),
            source_digest: Sha256::digest(source.as_bytes()).into(),
            width,
            height,
            shot_bytes,
        }
    }

    mod change_tests {
        use super::*;

        #[test]
        fn test_identical_fingerprint_is_unchanged() {
            let fp = fingerprint_of("<hierarchy/>", 1080, 1920, 4096);
            assert!(!changed(&fp, &fp.clone()));
        }

        #[test]
        fn test_tree_length_difference_is_changed() {
            let a = fingerprint_of("<hierarchy/>", 1080, 1920, 4096);
            let b = fingerprint_of("<hierarchy><node/></hierarchy>", 1080, 1920, 4096);
            assert!(changed(&a, &b));
        }

        #[test]
        fn test_same_length_different_bytes_is_changed() {
            let a = fingerprint_of("<node text='aa'/>", 1080, 1920, 0);
            let b = fingerprint_of("<node text='ab'/>", 1080, 1920, 0);
            assert_eq!(a.source_len, b.source_len);
            assert!(changed(&a, &b));
        }
    }

    mod stability_tests {
        use super::*;

        #[test]
        fn test_same_dimensions_is_stable() {
            let a = fingerprint_of("x", 100, 200, 0);
            let b = fingerprint_of("y", 100, 200, 0);
            assert!(stable(&a, &b));
        }

        #[test]
        fn test_swapped_dimensions_is_unstable() {
            let a = fingerprint_of("x", 100, 200, 0);
            let b = fingerprint_of("x", 200, 100, 0);
            assert!(!stable(&a, &b));
        }
    }

    mod variation_tests {
        use super::*;

        #[test]
        fn test_flat_series_has_zero_variation() {
            assert_eq!(variation_ratio(&[10_000, 10_000, 10_000]), 0.0);
        }

        #[test]
        fn test_variation_formula() {
            // (12000 - 8000) / 10000 = 0.4
            let ratio = variation_ratio(&[8_000, 10_000, 12_000]);
            assert!((ratio - 0.4).abs() < 1e-9);
        }

        #[test]
        fn test_short_series_is_zero() {
            assert_eq!(variation_ratio(&[]), 0.0);
            assert_eq!(variation_ratio(&[5_000]), 0.0);
        }

        #[test]
        fn test_consistency_bands() {
            let policy = StabilityPolicy::default();
            assert_eq!(consistency(&[10_000, 10_500], &policy), Consistency::Stable);
            assert_eq!(
                consistency(&[10_000, 12_000], &policy),
                Consistency::Tolerable
            );
            assert_eq!(
                consistency(&[10_000, 20_000], &policy),
                Consistency::Unstable
            );
            assert!(Consistency::Tolerable.is_acceptable());
            assert!(!Consistency::Unstable.is_acceptable());
        }
    }
}
