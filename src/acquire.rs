//! Fetching site pages and storing their fragment records.
//!
//! Target lists are split into shards, each shard is walked by one worker,
//! and every worker hands back an [`AcquisitionReport`] that the caller merges
//! and writes out once at the end of the run.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::extract::extract_fragments;
use crate::fetch::{HttpClient, fetch_text};
use crate::store::DirectoryStore;

const HTTPS_PREFIX: &str = "https://";

/// Sites between progress log lines.
const PROGRESS_EVERY: usize = 50;

/// A site whose fragments could not be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionFailure {
    pub site: String,
    pub reason: String,
    pub failed_at: DateTime<Utc>,
}

/// Outcome of acquiring one or more shards.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AcquisitionReport {
    pub stored: Vec<String>,
    pub failures: Vec<AcquisitionFailure>,
}

impl AcquisitionReport {
    pub fn merge(&mut self, other: AcquisitionReport) {
        self.stored.extend(other.stored);
        self.failures.extend(other.failures);
    }

    pub fn attempted(&self) -> usize {
        self.stored.len() + self.failures.len()
    }
}

/// Reads the target list: one site per line, taken from the last column
/// (`1, example.com` and `example.com` both yield `example.com`).
pub fn read_targets(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open target list {}", path.display()))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut sites = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if let Some(site) = record.iter().last().map(str::trim).filter(|s| !s.is_empty()) {
            sites.push(site.to_string());
        }
    }

    Ok(sites)
}

/// Splits `sites` into at most `workers` contiguous shards whose sizes
/// differ by at most one. Never returns an empty shard.
pub fn partition(sites: Vec<String>, workers: usize) -> Vec<Vec<String>> {
    let shards = workers.max(1).min(sites.len());
    if shards == 0 {
        return Vec::new();
    }

    let base = sites.len() / shards;
    let extra = sites.len() % shards;

    let mut remaining = sites.into_iter();
    (0..shards)
        .map(|i| {
            let size = base + usize::from(i < extra);
            remaining.by_ref().take(size).collect::<Vec<_>>()
        })
        .collect()
}

/// URL fetched for `site`; bare host names are requested over HTTPS.
pub fn site_url(site: &str) -> String {
    if site.starts_with("http://") || site.starts_with("https://") {
        site.to_string()
    } else {
        format!("{HTTPS_PREFIX}{site}")
    }
}

/// Fetches, extracts and stores each site of one shard in turn.
///
/// Failures are collected in the returned report; one site failing never
/// stops the shard.
pub async fn acquire_shard<C: HttpClient + ?Sized>(
    client: &C,
    sites: &[String],
    store: &DirectoryStore,
) -> AcquisitionReport {
    let mut report = AcquisitionReport::default();

    for (count, site) in sites.iter().enumerate() {
        match acquire_site(client, site, store).await {
            Ok(()) => report.stored.push(site.clone()),
            Err(e) => {
                warn!(site = %site, error = %e, "Failed to acquire site, skipping");
                report.failures.push(AcquisitionFailure {
                    site: site.clone(),
                    reason: e.to_string(),
                    failed_at: Utc::now(),
                });
            }
        }

        if (count + 1) % PROGRESS_EVERY == 0 {
            info!(done = count + 1, site = %site, "Shard progress");
        }
    }

    info!(stored = report.stored.len(), failed = report.failures.len(), "Shard finished");
    report
}

async fn acquire_site<C: HttpClient + ?Sized>(
    client: &C,
    site: &str,
    store: &DirectoryStore,
) -> Result<()> {
    let html = fetch_text(client, &site_url(site)).await?;
    debug!(site, bytes = html.len(), "Page received, extracting fragments");

    let record = extract_fragments(site, &html);
    store.save(&record)?;
    Ok(())
}

/// Writes the run's failures as CSV, replacing any previous report.
pub fn write_failures(path: &Path, failures: &[AcquisitionFailure]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("failed to create failure report {}", path.display()))?;

    for failure in failures {
        writer.serialize(failure)?;
    }
    writer.flush()?;

    Ok(())
}
