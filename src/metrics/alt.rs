//! Image-Tag Alt Adherence (ITAA).
//!
//! ```text
//! ITAA = <img> with a meaningful alt attribute / total <img>
//! ```
//!
//! An empty `alt` counts against the site: decorative images belong in CSS,
//! not in `<img>` elements with blank descriptions.

use super::markup::{attr, with_element};
use super::value::MetricValue;

/// Lower-cased phrases that mark an alt text as boilerplate.
static BOILERPLATE: &[&str] = &["graphic of", "image of", "picture of", "this is an image of"];

/// Whether `alt` describes the image rather than announcing that it is one.
pub fn is_meaningful_alt(alt: &str) -> bool {
    let lower = alt.to_lowercase();
    !(lower.is_empty() || lower == "image" || BOILERPLATE.iter().any(|p| lower.contains(p)))
}

/// Scores `<img>` fragments. Images without an `alt` attribute, and fragments
/// that hold no `<img>` at all, stay in the denominator but never count.
pub fn image_alt_adherence(alt_tags: &[String]) -> MetricValue {
    if alt_tags.is_empty() {
        return MetricValue::NoData;
    }

    let meaningful = alt_tags
        .iter()
        .filter(|tag| {
            with_element(tag, "img", |img| attr(&img, "alt"))
                .flatten()
                .is_some_and(|alt| is_meaningful_alt(&alt))
        })
        .count();

    MetricValue::ratio(meaningful, alt_tags.len())
}
