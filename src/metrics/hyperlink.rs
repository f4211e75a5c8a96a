//! Hyperlink Astonishment Minimization (HAM).
//!
//! A link is unsurprising when some word of its visible text appears in the
//! URL it points to.
//!
//! ```text
//! HAM = <a> whose text matches its href / total <a> with an href
//! ```

use super::markup::{attr, with_element};
use super::value::MetricValue;

/// Whether any single-space separated token of `text` occurs in `href`.
///
/// Matching is a case-sensitive substring test. Splitting on `' '` keeps
/// empty tokens (empty text, doubled or edge spaces) and an empty token is a
/// substring of every href, so such links always match.
pub fn text_matches_href(text: &str, href: &str) -> bool {
    text.split(' ').any(|token| href.contains(token))
}

/// Scores `<a href>` fragments. A fragment with no `<a>` element or no
/// `href` counts as inaccessible.
pub fn hyperlink_astonishment(href_tags: &[String]) -> MetricValue {
    if href_tags.is_empty() {
        return MetricValue::NoData;
    }

    let accessible = href_tags
        .iter()
        .filter(|tag| {
            with_element(tag, "a", |link| {
                let text: String = link.text().collect();
                attr(&link, "href").is_some_and(|href| text_matches_href(&text, &href))
            })
            .unwrap_or(false)
        })
        .count();

    MetricValue::ratio(accessible, href_tags.len())
}
