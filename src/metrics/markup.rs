//! Attribute access on single-element HTML fragments.

use scraper::{ElementRef, Html};

/// Parses `markup` and hands the first `tag` element in it to `f`.
///
/// Returns `None` when the fragment holds no such element; callers treat
/// that as a malformed fragment and skip it.
pub(crate) fn with_element<T>(
    markup: &str,
    tag: &str,
    f: impl FnOnce(ElementRef<'_>) -> T,
) -> Option<T> {
    let fragment = Html::parse_fragment(markup);
    let element = fragment
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == tag)?;
    Some(f(element))
}

/// Value of `name` on `element`, if the attribute is present.
pub(crate) fn attr(element: &ElementRef<'_>, name: &str) -> Option<String> {
    element.value().attr(name).map(str::to_string)
}

pub(crate) fn has_attr(element: &ElementRef<'_>, name: &str) -> bool {
    element.value().attr(name).is_some()
}
