//! Numeric extraction from free-form UI text.
//!
//! Game HUDs render counters as decorated strings ("Score: 12,450",
//! "Moves: 24 left"). The extractor pulls the first digit run out of such
//! text, tolerating comma thousands separators and surrounding noise.

use regex::Regex;
use std::sync::OnceLock;

fn first_digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d[\d,]*").unwrap())
}

/// Parse the first run of digits in `raw` into an integer.
///
/// Only the first matching run is used; later digit runs in the same string
/// are ignored, so `"Score: 12,450 / Best: 99,000"` yields `12450`. Returns
/// `None` (not an error) when the string contains no digits.
#[must_use]
pub fn extract_int(raw: &str) -> Option<i64> {
    let run = first_digit_run().find(raw)?;
    let digits: String = run
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
