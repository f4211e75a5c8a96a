//! Label-Input Mapping (LIM).
//!
//! ```text
//! LIM = <input> tied to a <label> / total <input>
//! ```
//!
//! An input is tied to a label when its `id` occurs inside the label's `for`
//! value. Hidden inputs never count as labelled.

use super::markup::{attr, has_attr, with_element};
use super::value::MetricValue;

#[derive(Debug)]
struct InputAttrs {
    id: Option<String>,
    hidden: bool,
}

/// The `for` attribute of a parsed `<label>`.
#[derive(Debug)]
enum LabelTarget {
    For(String),
    Missing,
}

impl InputAttrs {
    fn parse(markup: &str) -> Option<Self> {
        with_element(markup, "input", |input| InputAttrs {
            id: attr(&input, "id"),
            hidden: has_attr(&input, "hidden"),
        })
    }

    /// Scans labels in order until one claims this input. A label without a
    /// `for` attribute ends the scan.
    fn is_labelled(&self, labels: &[LabelTarget]) -> bool {
        let Some(id) = &self.id else {
            return false;
        };

        for label in labels {
            match label {
                LabelTarget::Missing => return false,
                LabelTarget::For(target) if target.contains(id.as_str()) && !self.hidden => {
                    return true;
                }
                LabelTarget::For(_) => {}
            }
        }
        false
    }
}

fn parse_label(markup: &str) -> Option<LabelTarget> {
    with_element(markup, "label", |label| match attr(&label, "for") {
        Some(target) => LabelTarget::For(target),
        None => LabelTarget::Missing,
    })
}

/// Scores `<input>` fragments against `<label>` fragments.
///
/// With no labels at all, a single visible input fails the whole site with
/// `0.0` straight away. Malformed fragments in either list are skipped;
/// malformed inputs still count in the denominator.
pub fn label_input_mapping(label_tags: &[String], input_tags: &[String]) -> MetricValue {
    if input_tags.is_empty() {
        return MetricValue::NoData;
    }

    let inputs: Vec<InputAttrs> = input_tags
        .iter()
        .filter_map(|tag| InputAttrs::parse(tag))
        .collect();

    if label_tags.is_empty() && inputs.iter().any(|input| !input.hidden) {
        return MetricValue::Ratio(0.0);
    }

    let labels: Vec<LabelTarget> = label_tags
        .iter()
        .filter_map(|tag| parse_label(tag))
        .collect();
    let labelled = inputs.iter().filter(|input| input.is_labelled(&labels)).count();

    MetricValue::ratio(labelled, input_tags.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_inputs_is_no_data() {
        let labels = tags(&[r#"<label for="x">X</label>"#]);
        assert_eq!(label_input_mapping(&labels, &[]), MetricValue::NoData);
    }

    #[test]
    fn test_visible_input_without_labels_short_circuits() {
        let inputs = tags(&[r#"<input id="x">"#]);
        assert_eq!(label_input_mapping(&[], &inputs), MetricValue::Ratio(0.0));
    }

    // The short-circuit ignores every other input, even ones that could never
    // be labelled anyway; pinned here so it is not "fixed" by accident.
    #[test]
    fn test_short_circuit_discards_remaining_inputs() {
        let inputs = tags(&[
            r#"<input id="a" hidden>"#,
            r#"<input id="b">"#,
            r#"<input id="c" hidden>"#,
        ]);
        assert_eq!(label_input_mapping(&[], &inputs), MetricValue::Ratio(0.0));
    }

    #[test]
    fn test_all_hidden_without_labels_falls_through_to_zero_matches() {
        let inputs = tags(&[
            r#"<input type="hidden" name="csrf" hidden>"#,
            r#"<input id="t" hidden>"#,
        ]);
        assert_eq!(label_input_mapping(&[], &inputs), MetricValue::Ratio(0.0));
    }

    #[test]
    fn test_id_substring_of_for_matches() {
        let labels = tags(&[r#"<label for="x-field">Name</label>"#]);
        let inputs = tags(&[r#"<input id="x">"#]);
        assert_eq!(label_input_mapping(&labels, &inputs), MetricValue::Ratio(1.0));
    }

    #[test]
    fn test_for_substring_of_id_does_not_match() {
        let labels = tags(&[r#"<label for="x">Name</label>"#]);
        let inputs = tags(&[r#"<input id="x-field">"#]);
        assert_eq!(label_input_mapping(&labels, &inputs), MetricValue::Ratio(0.0));
    }

    #[test]
    fn test_hidden_input_with_matching_label_does_not_count() {
        let labels = tags(&[r#"<label for="token">Token</label>"#]);
        let inputs = tags(&[r#"<input id="token" hidden>"#, r#"<input id="email">"#]);
        assert_eq!(label_input_mapping(&labels, &inputs), MetricValue::Ratio(0.0));
    }

    #[test]
    fn test_input_without_id_counts_in_denominator_only() {
        let labels = tags(&[r#"<label for="email">Email</label>"#]);
        let inputs = tags(&[r#"<input id="email">"#, r#"<input type="submit">"#]);
        assert_eq!(label_input_mapping(&labels, &inputs), MetricValue::Ratio(0.5));
    }

    #[test]
    fn test_each_input_counted_once() {
        let labels = tags(&[
            r#"<label for="q">Search</label>"#,
            r#"<label for="q">Again</label>"#,
        ]);
        let inputs = tags(&[r#"<input id="q">"#]);
        assert_eq!(label_input_mapping(&labels, &inputs), MetricValue::Ratio(1.0));
    }

    #[test]
    fn test_label_without_for_ends_scan() {
        let labels = tags(&["<label>Remember me</label>", r#"<label for="user">User</label>"#]);
        let inputs = tags(&[r#"<input id="user">"#]);
        assert_eq!(label_input_mapping(&labels, &inputs), MetricValue::Ratio(0.0));

        let reordered = tags(&[r#"<label for="user">User</label>"#, "<label>Remember me</label>"]);
        assert_eq!(label_input_mapping(&reordered, &inputs), MetricValue::Ratio(1.0));
    }

    #[test]
    fn test_malformed_fragments_are_skipped() {
        let labels = tags(&["<div>not a label</div>", r#"<label for="name">Name</label>"#]);
        let inputs = tags(&["<textarea></textarea>", r#"<input id="name">"#]);
        assert_eq!(label_input_mapping(&labels, &inputs), MetricValue::Ratio(0.5));
    }
}
