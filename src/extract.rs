//! Collects the tag fragments the metrics need from a full page.

use scraper::{ElementRef, Html};

use crate::record::FragmentRecord;

/// Builds the fragment record for `name` from its page HTML.
///
/// Keeps, in document order, the outer markup of every `<img>`, every `<a>`
/// carrying an `href`, every `<label>` and every `<input>`. Nothing else of
/// the page is retained.
pub fn extract_fragments(name: &str, page_html: &str) -> FragmentRecord {
    let document = Html::parse_document(page_html);
    let mut record = FragmentRecord::empty(name);

    for element in document.root_element().descendants().filter_map(ElementRef::wrap) {
        let tags = match element.value().name() {
            "img" => &mut record.alt_tags,
            "a" if element.value().attr("href").is_some() => &mut record.href_tags,
            "label" => &mut record.label_tags,
            "input" => &mut record.input_tags,
            _ => continue,
        };
        tags.push(element.html());
    }

    record
}
