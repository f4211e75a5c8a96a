//! Totals reported at the end of a scoring run.

use serde::Serialize;

use super::utility::RunningStats;
use crate::lookup::UNAVAILABLE;
use crate::metrics::MetricValue;
use crate::output::ResultRow;

/// Spread of one metric over the sites that had data for it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSummary {
    pub sites_with_data: usize,
    pub mean: f64,
    pub stddev: f64,
}

impl From<&RunningStats> for MetricSummary {
    fn from(stats: &RunningStats) -> Self {
        MetricSummary {
            sites_with_data: stats.count(),
            mean: stats.mean(),
            stddev: stats.stddev(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub rows_written: usize,
    pub unreadable_records: usize,
    pub lookups_failed: usize,
    /// A stop was requested before every stored record was scored.
    pub stopped_early: bool,
    #[serde(skip)]
    itaa: RunningStats,
    #[serde(skip)]
    ham: RunningStats,
    #[serde(skip)]
    lim: RunningStats,
}

impl AggregateSummary {
    pub(crate) fn record(&mut self, row: &ResultRow) {
        self.rows_written += 1;
        if row.accessibility_percent == UNAVAILABLE {
            self.lookups_failed += 1;
        }

        let columns = [
            (&mut self.itaa, row.itaa),
            (&mut self.ham, row.ham),
            (&mut self.lim, row.lim),
        ];
        for (stats, value) in columns {
            if let MetricValue::Ratio(v) = value {
                stats.push(v);
            }
        }
    }

    pub fn itaa(&self) -> MetricSummary {
        MetricSummary::from(&self.itaa)
    }

    pub fn ham(&self) -> MetricSummary {
        MetricSummary::from(&self.ham)
    }

    pub fn lim(&self) -> MetricSummary {
        MetricSummary::from(&self.lim)
    }
}
