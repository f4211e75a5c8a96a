//! Per-site fragment records produced by acquisition and consumed by scoring.

use serde::{Deserialize, Serialize};

/// The raw tag fragments collected for one site.
///
/// Serialized with the same field names the stored JSON files have always
/// used (`alt-tags`, `href-tags`, ...), so records written by earlier runs
/// still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentRecord {
    pub name: String,

    #[serde(rename = "alt-tags", default)]
    pub alt_tags: Vec<String>,
    #[serde(rename = "href-tags", default)]
    pub href_tags: Vec<String>,
    #[serde(rename = "label-tags", default)]
    pub label_tags: Vec<String>,
    #[serde(rename = "input-tags", default)]
    pub input_tags: Vec<String>,
}

impl FragmentRecord {
    /// Creates a record with no fragments in any category.
    pub fn empty(name: &str) -> Self {
        FragmentRecord {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Total number of fragments across all four categories.
    pub fn fragment_count(&self) -> usize {
        self.alt_tags.len() + self.href_tags.len() + self.label_tags.len() + self.input_tags.len()
    }
}
