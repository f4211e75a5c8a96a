//! Accessibility heuristics computed from a site's stored tag fragments.
//!
//! Each metric is a pure function over one tag category (two for LIM) and
//! yields a [`MetricValue`]: a ratio in `[0, 1]`, or [`MetricValue::NoData`]
//! when the category it scores is empty.

pub mod alt;
pub mod hyperlink;
pub mod label_input;
mod markup;
pub mod value;

pub use alt::image_alt_adherence;
pub use hyperlink::hyperlink_astonishment;
pub use label_input::label_input_mapping;
pub use value::MetricValue;

use serde::Serialize;

use crate::record::FragmentRecord;

/// The three adherence scores for one site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiteMetrics {
    /// Image-Tag Alt Adherence.
    pub itaa: MetricValue,
    /// Hyperlink Astonishment Minimization.
    pub ham: MetricValue,
    /// Label-Input Mapping.
    pub lim: MetricValue,
}

impl SiteMetrics {
    /// Scores every category of `record`. Categories are independent; an
    /// empty one only turns its own metric into `NoData`.
    pub fn evaluate(record: &FragmentRecord) -> Self {
        SiteMetrics {
            itaa: image_alt_adherence(&record.alt_tags),
            ham: hyperlink_astonishment(&record.href_tags),
            lim: label_input_mapping(&record.label_tags, &record.input_tags),
        }
    }

    /// Metrics for a site whose fragments could not be read at all.
    pub fn no_data() -> Self {
        SiteMetrics {
            itaa: MetricValue::NoData,
            ham: MetricValue::NoData,
            lim: MetricValue::NoData,
        }
    }
}
