//! Trait and simple sources for a site's external accessibility percentage.

use async_trait::async_trait;
use std::collections::HashMap;

/// Reported when no percentage could be obtained for a site.
pub const UNAVAILABLE: &str = "-1%";

/// Abstraction over a service that rates a site's WCAG adherence.
///
/// Implementations may be slow and may retry internally, but always resolve:
/// any failure is reported as [`UNAVAILABLE`], never as an error.
#[async_trait]
pub trait AccessibilityLookup: Send + Sync {
    async fn lookup(&self, site: &str) -> String;
}

/// A lookup that never has data, for offline scoring runs.
pub struct Unavailable;

#[async_trait]
impl AccessibilityLookup for Unavailable {
    async fn lookup(&self, _site: &str) -> String {
        UNAVAILABLE.to_string()
    }
}

/// Percentages known ahead of time, keyed by site name.
#[derive(Default)]
pub struct StaticLookup {
    entries: HashMap<String, String>,
}

impl StaticLookup {
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

#[async_trait]
impl AccessibilityLookup for StaticLookup {
    async fn lookup(&self, site: &str) -> String {
        self.entries
            .get(site)
            .cloned()
            .unwrap_or_else(|| UNAVAILABLE.to_string())
    }
}
