//! Scoring run over every stored fragment record.
//!
//! Each record is scored, paired with its looked-up accessibility percentage
//! and appended to the results table before the next record is loaded.

pub mod summary;
pub mod utility;

pub use summary::{AggregateSummary, MetricSummary};

use anyhow::Result;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, warn};

use crate::lookup::AccessibilityLookup;
use crate::metrics::SiteMetrics;
use crate::output::{ResultRow, append_row};
use crate::store::FragmentStore;

/// Order in which stored records are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordOrder {
    /// Whatever order the store lists them in.
    #[default]
    Listing,
    /// Sorted by site name, as reported by [`FragmentStore::name_of`].
    ByName,
}

/// Scores every record in `store` and appends one row per record to
/// `output`.
///
/// `stop` is checked between records only; a record already being scored is
/// always finished and written. Failing to write a row aborts the run, since
/// no later row could be persisted either.
#[tracing::instrument(skip(store, lookup, output, stop), fields(output = %output.display()))]
pub async fn aggregate<S, L>(
    store: &S,
    lookup: &L,
    output: &Path,
    order: RecordOrder,
    stop: &AtomicBool,
) -> Result<AggregateSummary>
where
    S: FragmentStore + ?Sized,
    L: AccessibilityLookup + ?Sized,
{
    let mut keys = store.keys()?;
    if order == RecordOrder::ByName {
        keys.sort_by_cached_key(|key| store.name_of(key));
    }
    info!(records = keys.len(), "Scoring stored fragment records");

    let mut summary = AggregateSummary::default();

    for key in keys {
        if stop.load(Ordering::Relaxed) {
            warn!(rows_written = summary.rows_written, "Stop requested, ending scoring run");
            summary.stopped_early = true;
            break;
        }

        let (name, metrics) = match store.load(&key) {
            Ok(record) => {
                let metrics = SiteMetrics::evaluate(&record);
                (record.name, metrics)
            }
            Err(e) => {
                error!(key = %key, error = %e, "Unreadable fragment record, scoring as no data");
                summary.unreadable_records += 1;
                (store.name_of(&key), SiteMetrics::no_data())
            }
        };

        debug!(site = %name, "Looking up accessibility percentage");
        let percent = lookup.lookup(&name).await;

        let row = ResultRow::new(&name, metrics, percent);
        append_row(output, &row)?;
        summary.record(&row);

        info!(
            site = %row.name,
            itaa = %row.itaa,
            ham = %row.ham,
            lim = %row.lim,
            accessibility = %row.accessibility_percent,
            "Site scored"
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{StaticLookup, Unavailable};
    use crate::metrics::MetricValue;
    use crate::output::read_rows;
    use crate::record::FragmentRecord;
    use crate::store::{DirectoryStore, MemoryStore};
    use async_trait::async_trait;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let path = env::temp_dir().join(name);
        let _ = fs::remove_file(&path);
        path
    }

    fn temp_store(name: &str) -> DirectoryStore {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        DirectoryStore::create(dir).unwrap()
    }

    fn record(name: &str) -> FragmentRecord {
        FragmentRecord {
            name: name.to_string(),
            alt_tags: vec![r#"<img alt="a photo">"#.to_string()],
            ..Default::default()
        }
    }

    fn names_in(path: &Path) -> Vec<String> {
        read_rows(path).unwrap().into_iter().map(|r| r.name).collect()
    }

    /// Raises the stop flag after answering a fixed number of lookups.
    struct StopAfter<'a> {
        remaining: std::sync::atomic::AtomicUsize,
        stop: &'a AtomicBool,
    }

    #[async_trait]
    impl<'a> AccessibilityLookup for StopAfter<'a> {
        async fn lookup(&self, _site: &str) -> String {
            if self.remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                self.stop.store(true, Ordering::SeqCst);
            }
            "50%".to_string()
        }
    }

    #[tokio::test]
    async fn test_one_row_per_record_in_listing_order() {
        let path = temp_path("web_a11y_rater_agg_listing.csv");
        let store = MemoryStore::new(vec![record("c.com"), record("a.com"), record("b.com")]);
        let stop = AtomicBool::new(false);

        let summary = aggregate(&store, &Unavailable, &path, RecordOrder::Listing, &stop)
            .await
            .unwrap();

        assert_eq!(names_in(&path), vec!["c.com", "a.com", "b.com"]);
        assert_eq!(summary.rows_written, 3);
        assert_eq!(summary.lookups_failed, 3);
        assert!(!summary.stopped_early);

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_sorted_order() {
        let path = temp_path("web_a11y_rater_agg_sorted.csv");
        let store = MemoryStore::new(vec![record("c.com"), record("a.com"), record("b.com")]);
        let stop = AtomicBool::new(false);

        aggregate(&store, &Unavailable, &path, RecordOrder::ByName, &stop)
            .await
            .unwrap();

        assert_eq!(names_in(&path), vec!["a.com", "b.com", "c.com"]);

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_sorted_order_uses_site_names_not_file_keys() {
        let store = temp_store("web_a11y_rater_agg_sorted_paths");
        store.save(&record("a0.com")).unwrap();
        store.save(&record("a/b.com")).unwrap();
        let path = temp_path("web_a11y_rater_agg_sorted_paths.csv");
        let stop = AtomicBool::new(false);

        aggregate(&store, &Unavailable, &path, RecordOrder::ByName, &stop)
            .await
            .unwrap();

        // '/' sorts before '0'
        assert_eq!(names_in(&path), vec!["a/b.com", "a0.com"]);

        fs::remove_file(&path).unwrap();
        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[tokio::test]
    async fn test_lookup_value_is_appended() {
        let path = temp_path("web_a11y_rater_agg_lookup.csv");
        let store = MemoryStore::new(vec![record("a.com")]);
        let lookup = StaticLookup::new([("a.com".to_string(), "73%".to_string())]);
        let stop = AtomicBool::new(false);

        let summary = aggregate(&store, &lookup, &path, RecordOrder::Listing, &stop)
            .await
            .unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows[0].accessibility_percent, "73%");
        assert_eq!(rows[0].itaa, MetricValue::Ratio(1.0));
        assert_eq!(summary.lookups_failed, 0);

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_rows_accumulate_across_runs() {
        let path = temp_path("web_a11y_rater_agg_accumulate.csv");
        let store = MemoryStore::new(vec![record("a.com"), record("b.com")]);
        let stop = AtomicBool::new(false);

        aggregate(&store, &Unavailable, &path, RecordOrder::Listing, &stop).await.unwrap();
        aggregate(&store, &Unavailable, &path, RecordOrder::Listing, &stop).await.unwrap();

        assert_eq!(read_rows(&path).unwrap().len(), 4);

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_stop_is_observed_between_records() {
        let path = temp_path("web_a11y_rater_agg_stop.csv");
        let store = MemoryStore::new(vec![record("a.com"), record("b.com"), record("c.com")]);
        let stop = AtomicBool::new(false);
        let lookup = StopAfter {
            remaining: std::sync::atomic::AtomicUsize::new(2),
            stop: &stop,
        };

        let summary = aggregate(&store, &lookup, &path, RecordOrder::Listing, &stop)
            .await
            .unwrap();

        // the record in flight when the stop arrives is still written
        assert_eq!(read_rows(&path).unwrap().len(), 2);
        assert_eq!(summary.rows_written, 2);
        assert!(summary.stopped_early);

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_unreadable_record_becomes_no_data_row() {
        struct FlakyStore;

        impl FragmentStore for FlakyStore {
            fn keys(&self) -> Result<Vec<String>> {
                Ok(vec!["broken.com".to_string(), "fine.com".to_string()])
            }

            fn load(&self, key: &str) -> Result<FragmentRecord> {
                if key == "broken.com" {
                    Err(anyhow::anyhow!("truncated file"))
                } else {
                    Ok(record(key))
                }
            }
        }

        let path = temp_path("web_a11y_rater_agg_unreadable.csv");
        let stop = AtomicBool::new(false);

        let summary = aggregate(&FlakyStore, &Unavailable, &path, RecordOrder::Listing, &stop)
            .await
            .unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "broken.com");
        assert_eq!(rows[0].metrics(), SiteMetrics::no_data());
        assert_eq!(rows[1].itaa, MetricValue::Ratio(1.0));
        assert_eq!(summary.unreadable_records, 1);

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_unreadable_record_keeps_site_name() {
        let store = temp_store("web_a11y_rater_agg_unreadable_path");
        let key = crate::store::key_for("example.com/shop");
        fs::write(store.dir().join(format!("{key}.json")), "{\"name\": ").unwrap();
        let path = temp_path("web_a11y_rater_agg_unreadable_path.csv");
        let lookup = StaticLookup::new([("example.com/shop".to_string(), "64%".to_string())]);
        let stop = AtomicBool::new(false);

        let summary = aggregate(&store, &lookup, &path, RecordOrder::Listing, &stop)
            .await
            .unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "example.com/shop");
        assert_eq!(rows[0].accessibility_percent, "64%");
        assert_eq!(summary.unreadable_records, 1);

        fs::remove_file(&path).unwrap();
        fs::remove_dir_all(store.dir()).unwrap();
    }
}
