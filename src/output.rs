//! Results table persistence.
//!
//! Rows are appended to a headerless CSV one at a time, each write flushed
//! before the next site is scored.

use anyhow::{Context, Result};
use tracing::debug;

use crate::metrics::{MetricValue, SiteMetrics};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// One line of the results table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub name: String,
    pub itaa: MetricValue,
    pub ham: MetricValue,
    pub lim: MetricValue,
    pub accessibility_percent: String,
}

impl ResultRow {
    pub fn new(name: &str, metrics: SiteMetrics, accessibility_percent: String) -> Self {
        ResultRow {
            name: name.to_string(),
            itaa: metrics.itaa,
            ham: metrics.ham,
            lim: metrics.lim,
            accessibility_percent,
        }
    }

    pub fn metrics(&self) -> SiteMetrics {
        SiteMetrics {
            itaa: self.itaa,
            ham: self.ham,
            lim: self.lim,
        }
    }

    fn to_record(&self) -> [String; 5] {
        [
            self.name.clone(),
            self.itaa.to_string(),
            self.ham.to_string(),
            self.lim.to_string(),
            self.accessibility_percent.clone(),
        ]
    }

    fn from_record(record: &csv::StringRecord) -> Result<Self> {
        if record.len() != 5 {
            return Err(anyhow::anyhow!("expected 5 columns, found {}", record.len()));
        }
        Ok(ResultRow {
            name: record[0].to_string(),
            itaa: record[1].parse()?,
            ham: record[2].parse()?,
            lim: record[3].parse()?,
            accessibility_percent: record[4].to_string(),
        })
    }
}

/// Appends `row` to the CSV at `path`, creating the file if needed.
///
/// The file is never truncated: running twice against the same path leaves
/// both runs' rows in it.
pub fn append_row(path: &Path, row: &ResultRow) -> Result<()> {
    debug!(path = %path.display(), site = %row.name, "Appending result row");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("failed to open results table {}", path.display()))?;

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(row.to_record())?;
    writer.flush()?;

    Ok(())
}

/// Reads every row of a results table written by [`append_row`].
pub fn read_rows(path: &Path) -> Result<Vec<ResultRow>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open results table {}", path.display()))?;
    let mut rdr = ReaderBuilder::new().has_headers(false).from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(ResultRow::from_record(&record)?);
    }

    Ok(rows)
}
