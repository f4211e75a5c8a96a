use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Rendering of [`MetricValue::NoData`] in the results table.
pub const NO_DATA: &str = "No Data";

/// A single adherence score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// Proportion of accessible elements, always within `[0, 1]`.
    Ratio(f64),
    /// The scored tag category was empty for this site.
    NoData,
}

impl MetricValue {
    /// `part / total` as a ratio. `total` must be non-zero; callers return
    /// `NoData` for empty categories before getting here.
    pub fn ratio(part: usize, total: usize) -> Self {
        debug_assert!(total > 0 && part <= total);
        MetricValue::Ratio(part as f64 / total as f64)
    }

    pub fn as_ratio(&self) -> Option<f64> {
        match self {
            MetricValue::Ratio(v) => Some(*v),
            MetricValue::NoData => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Debug keeps the trailing ".0" on whole numbers ("1.0", not "1")
            MetricValue::Ratio(v) => write!(f, "{v:?}"),
            MetricValue::NoData => f.write_str(NO_DATA),
        }
    }
}

impl FromStr for MetricValue {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        if s == NO_DATA {
            return Ok(MetricValue::NoData);
        }
        let v: f64 = s
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid metric value '{}': {}", s, e))?;
        if !(0.0..=1.0).contains(&v) {
            return Err(anyhow::anyhow!("metric value {} outside [0, 1]", v));
        }
        Ok(MetricValue::Ratio(v))
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Ratio(v) => serializer.serialize_f64(*v),
            MetricValue::NoData => serializer.serialize_str(NO_DATA),
        }
    }
}
