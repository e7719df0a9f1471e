//! Heuristic color classification over sampled screenshot pixels.
//!
//! No image recognition happens here. A handful of pixels are sampled from
//! fixed screen positions and pushed through threshold heuristics: is the
//! screen blank, mostly black or white, does it carry colorful content, does
//! it look like the game's palette. Thresholds are deliberately band-shaped
//! so minor rendering noise does not produce false failures — correctness is
//! "good enough", not exact.

use crate::result::{TantearError, TantearResult};
use image::GenericImageView;
use serde::{Deserialize, Serialize};

/// One sampled pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSample {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl ColorSample {
    /// Create a sample
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as a tuple
    #[must_use]
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Largest pairwise channel difference
    #[must_use]
    pub const fn channel_spread(&self) -> u8 {
        let hi = max3(self.r, self.g, self.b);
        let lo = min3(self.r, self.g, self.b);
        hi - lo
    }
}

impl From<(u8, u8, u8)> for ColorSample {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

const fn max3(a: u8, b: u8, c: u8) -> u8 {
    let ab = if a > b { a } else { b };
    if ab > c {
        ab
    } else {
        c
    }
}

const fn min3(a: u8, b: u8, c: u8) -> u8 {
    let ab = if a < b { a } else { b };
    if ab < c {
        ab
    } else {
        c
    }
}

/// Thresholds for sample classification.
///
/// The defaults are the compatibility values; change them only when a
/// scenario deliberately wants a looser or stricter read of the screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColorPolicy {
    /// All channels strictly below this bound reads as near-black
    pub near_black_below: u8,
    /// All channels strictly above this bound reads as near-white
    pub near_white_above: u8,
    /// Pairwise channel spread strictly below this bound reads as gray
    pub gray_spread_below: u8,
    /// All channels strictly below this bound reads as very dark
    pub very_dark_below: u8,
    /// All channels strictly above this bound reads as very light
    pub very_light_above: u8,
    /// Colorful-sample fraction required for a "colorful content" verdict
    pub colorful_fraction: f64,
    /// Sample fraction required for a hue-band match verdict
    pub hue_band_fraction: f64,
    /// Quantization width for dominant-color buckets
    pub bucket_width: u8,
    /// Number of dominant buckets reported
    pub dominant_top_k: usize,
}

impl Default for ColorPolicy {
    fn default() -> Self {
        Self {
            near_black_below: 30,
            near_white_above: 225,
            gray_spread_below: 30,
            very_dark_below: 50,
            very_light_above: 200,
            colorful_fraction: 0.30,
            hue_band_fraction: 0.20,
            bucket_width: 30,
            dominant_top_k: 5,
        }
    }
}

impl ColorPolicy {
    /// Set the colorful-content fraction
    #[must_use]
    pub const fn with_colorful_fraction(mut self, fraction: f64) -> Self {
        self.colorful_fraction = fraction;
        self
    }

    /// Set the hue-band fraction
    #[must_use]
    pub const fn with_hue_band_fraction(mut self, fraction: f64) -> Self {
        self.hue_band_fraction = fraction;
        self
    }
}

/// Classification of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorClass {
    /// All channels below the near-black bound
    NearBlack,
    /// All channels above the near-white bound
    NearWhite,
    /// Low channel spread, or very dark / very light
    Grayscale,
    /// Everything else: saturated, mid-brightness content
    Colorful,
}

/// Classify one sample against the policy.
///
/// Near-black and near-white take precedence; "colorful" means not
/// gray-spread, not very dark, not very light.
#[must_use]
pub fn classify(sample: ColorSample, policy: &ColorPolicy) -> ColorClass {
    let (r, g, b) = sample.rgb();
    if r < policy.near_black_below && g < policy.near_black_below && b < policy.near_black_below {
        return ColorClass::NearBlack;
    }
    if r > policy.near_white_above && g > policy.near_white_above && b > policy.near_white_above {
        return ColorClass::NearWhite;
    }
    let gray_spread = sample.channel_spread() < policy.gray_spread_below;
    let very_dark =
        r < policy.very_dark_below && g < policy.very_dark_below && b < policy.very_dark_below;
    let very_light =
        r > policy.very_light_above && g > policy.very_light_above && b > policy.very_light_above;
    if !gray_spread && !very_dark && !very_light {
        ColorClass::Colorful
    } else {
        ColorClass::Grayscale
    }
}

/// Per-class counts over a sample set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleClassification {
    /// Samples reading as gray (including very dark / very light)
    pub grayscale: usize,
    /// Samples reading as near-black
    pub near_black: usize,
    /// Samples reading as near-white
    pub near_white: usize,
    /// Samples reading as colorful
    pub colorful: usize,
}

impl SampleClassification {
    /// Total samples classified
    #[must_use]
    pub const fn total(&self) -> usize {
        self.grayscale + self.near_black + self.near_white + self.colorful
    }
}

/// Classify every sample and count the classes.
#[must_use]
pub fn classify_samples(samples: &[ColorSample], policy: &ColorPolicy) -> SampleClassification {
    let mut counts = SampleClassification::default();
    for &sample in samples {
        match classify(sample, policy) {
            ColorClass::NearBlack => counts.near_black += 1,
            ColorClass::NearWhite => counts.near_white += 1,
            ColorClass::Grayscale => counts.grayscale += 1,
            ColorClass::Colorful => counts.colorful += 1,
        }
    }
    counts
}

/// Whether the colorful-sample fraction reaches the policy's bar.
#[must_use]
pub fn has_colorful_content(samples: &[ColorSample], policy: &ColorPolicy) -> bool {
    if samples.is_empty() {
        return false;
    }
    let colorful = classify_samples(samples, policy).colorful;
    colorful as f64 >= samples.len() as f64 * policy.colorful_fraction
}

/// An inclusive RGB box naming a color family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HueBand {
    /// Family name for logs and reports
    pub name: &'static str,
    /// Inclusive lower channel bounds
    pub min: (u8, u8, u8),
    /// Inclusive upper channel bounds
    pub max: (u8, u8, u8),
}

impl HueBand {
    /// Create a band
    #[must_use]
    pub const fn new(name: &'static str, min: (u8, u8, u8), max: (u8, u8, u8)) -> Self {
        Self { name, min, max }
    }

    /// Whether the sample falls inside the box (inclusive on both ends)
    #[must_use]
    pub const fn contains(&self, sample: ColorSample) -> bool {
        sample.r >= self.min.0
            && sample.r <= self.max.0
            && sample.g >= self.min.1
            && sample.g <= self.max.1
            && sample.b >= self.min.2
            && sample.b <= self.max.2
    }
}

/// The flexible band set covering the game palette's color families.
#[must_use]
pub const fn flexible_bands() -> [HueBand; 6] {
    [
        HueBand::new("rose", (180, 50, 80), (255, 180, 200)),
        HueBand::new("blue", (50, 100, 180), (150, 200, 255)),
        HueBand::new("gold", (200, 150, 50), (255, 255, 150)),
        HueBand::new("green", (80, 180, 80), (180, 255, 180)),
        HueBand::new("violet", (100, 50, 150), (200, 150, 255)),
        HueBand::new("orange", (200, 100, 50), (255, 180, 100)),
    ]
}

/// Whether enough samples fall inside ANY of the declared bands.
///
/// A sample counts once even if several bands contain it. The verdict is
/// `matches >= total * min_fraction`.
#[must_use]
pub fn matches_hue_bands(samples: &[ColorSample], bands: &[HueBand], min_fraction: f64) -> bool {
    if samples.is_empty() {
        return false;
    }
    let matches = samples
        .iter()
        .filter(|&&sample| bands.iter().any(|band| band.contains(sample)))
        .count();
    matches as f64 >= samples.len() as f64 * min_fraction
}

/// Coarse mode-seeking over samples: quantize each into a
/// `(r / w * w, g / w * w, b / w * w)` bucket, rank buckets by member count
/// descending, and return up to `top_k` bucket keys. Ties keep first-seen
/// order (stable sort); this is a heuristic, not a clustering algorithm.
#[must_use]
pub fn dominant_colors(
    samples: &[ColorSample],
    top_k: usize,
    policy: &ColorPolicy,
) -> Vec<(u8, u8, u8)> {
    let width = policy.bucket_width.max(1);
    let mut buckets: Vec<((u8, u8, u8), usize)> = Vec::new();
    for sample in samples {
        let key = (
            sample.r / width * width,
            sample.g / width * width,
            sample.b / width * width,
        );
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => buckets.push((key, 1)),
        }
    }
    buckets.sort_by(|a, b| b.1.cmp(&a.1));
    buckets.into_iter().take(top_k).map(|(key, _)| key).collect()
}

/// Cross-state bucket-reuse ratio: `1 - unique / total` over the dominant
/// buckets collected from several screen states.
///
/// Preserved from the original heuristic; it conflates color reuse with
/// genuine theme consistency and its thresholds are empirically tuned, so
/// treat the value as an indicator, never as a correctness oracle.
#[must_use]
pub fn consistency_ratio(all_dominant: &[(u8, u8, u8)]) -> f64 {
    if all_dominant.is_empty() {
        return 0.0;
    }
    let mut unique: Vec<(u8, u8, u8)> = Vec::new();
    for &key in all_dominant {
        if !unique.contains(&key) {
            unique.push(key);
        }
    }
    1.0 - unique.len() as f64 / all_dominant.len() as f64
}

/// The five standard sample positions: quadrant centers plus screen center.
#[must_use]
pub fn grid_points(width: u32, height: u32) -> [(u32, u32); 5] {
    [
        (width / 4, height / 4),
        (3 * width / 4, height / 4),
        (width / 2, height / 2),
        (width / 4, 3 * height / 4),
        (3 * width / 4, 3 * height / 4),
    ]
}

/// Decode a screenshot's pixel dimensions.
///
/// # Errors
///
/// Returns [`TantearError::ImageDecode`] when the bytes are not a decodable
/// image.
pub fn png_dimensions(png: &[u8]) -> TantearResult<(u32, u32)> {
    let decoded = image::load_from_memory(png).map_err(|e| TantearError::ImageDecode {
        message: e.to_string(),
    })?;
    Ok(decoded.dimensions())
}

/// Decode a PNG screenshot and sample the standard five-point grid.
///
/// # Errors
///
/// Returns [`TantearError::ImageDecode`] when the bytes are not a decodable
/// image.
pub fn samples_from_png(png: &[u8]) -> TantearResult<Vec<ColorSample>> {
    let decoded = image::load_from_memory(png).map_err(|e| TantearError::ImageDecode {
        message: e.to_string(),
    })?;
    let (width, height) = decoded.dimensions();
    let rgb = decoded.to_rgb8();
    let samples = grid_points(width, height)
        .iter()
        .map(|&(x, y)| {
            let px = rgb.get_pixel(x.min(width - 1), y.min(height - 1));
            ColorSample::new(px[0], px[1], px[2])
        })
        .collect();
    Ok(samples)
}
