//! CLI entry point for the web accessibility rater.
//!
//! Provides subcommands for acquiring tag fragments from a list of sites,
//! scoring stored fragments into a results table, doing both in one go, and
//! evaluating a single stored record.

mod infra;

use crate::infra::webaccessibility::{DEFAULT_BASE_URL, WebAccessibilityClient};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::Instrument;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use web_a11y_rater::{
    acquire::{AcquisitionReport, acquire_shard, partition, read_targets, write_failures},
    aggregator::{AggregateSummary, RecordOrder, aggregate},
    fetch::BasicClient,
    lookup::{AccessibilityLookup, Unavailable},
    metrics::SiteMetrics,
    record::FragmentRecord,
    store::DirectoryStore,
};

#[derive(Parser)]
#[command(name = "web_a11y_rater")]
#[command(about = "Estimate website accessibility from stored HTML fragments", long_about = None)]
struct Cli {
    /// Directory holding one fragment record (JSON) per site
    #[arg(short, long, global = true, default_value = "fragments")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AcquireArgs {
    /// CSV listing the sites to fetch; the last column of each line is used
    #[arg(short, long, value_name = "CSV")]
    targets: PathBuf,

    /// Number of shards fetched concurrently
    #[arg(short, long, default_value_t = 3)]
    workers: usize,

    /// Per-page request timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// CSV file listing the sites that could not be fetched
    #[arg(long, default_value = "failures.csv")]
    failures: PathBuf,
}

#[derive(Args)]
struct ScoreArgs {
    /// CSV file to append result rows to
    #[arg(short, long, default_value = "results.csv")]
    output: PathBuf,

    /// Score sites sorted by site name instead of directory order
    #[arg(long, default_value_t = false)]
    sorted: bool,

    /// Skip the external accessibility lookup and report "-1%" for every site
    #[arg(long, default_value_t = false)]
    no_lookup: bool,

    /// Seconds to wait before retrying a lookup whose result was not ready
    #[arg(long, default_value_t = 15)]
    retry_delay_secs: u64,

    /// Lookup request timeout in seconds
    #[arg(long, default_value_t = 60)]
    lookup_timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every target site and store its tag fragments
    Acquire(AcquireArgs),
    /// Score stored fragment records into the results table
    Score(ScoreArgs),
    /// Acquire fragments, then score them
    Run {
        #[command(flatten)]
        acquire: AcquireArgs,

        #[command(flatten)]
        score: ScoreArgs,
    },
    /// Print the metrics of a single stored fragment record
    Evaluate {
        /// Path to a fragment record JSON file
        #[arg(value_name = "RECORD")]
        record: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/web_a11y_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("web_a11y_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Acquire(args) => {
            acquire_all(&cli.store, &args).await?;
        }
        Commands::Score(args) => {
            score(&cli.store, &args).await?;
        }
        Commands::Run { acquire, score: score_args } => {
            acquire_all(&cli.store, &acquire).await?;
            score(&cli.store, &score_args).await?;
        }
        Commands::Evaluate { record } => {
            let content = std::fs::read_to_string(&record)
                .with_context(|| format!("failed to read {}", record.display()))?;
            let record: FragmentRecord = serde_json::from_str(&content)?;
            let metrics = SiteMetrics::evaluate(&record);

            info!(site = %record.name, "{}", serde_json::to_string_pretty(&metrics)?);
        }
    }

    Ok(())
}

/// Splits the target list into shards and acquires them concurrently, one
/// task per shard, then writes the merged failure report.
#[tracing::instrument(
    skip_all,
    fields(
        targets = %args.targets.display(),
        store = %store_dir.display(),
        workers = args.workers
    )
)]
async fn acquire_all(store_dir: &Path, args: &AcquireArgs) -> Result<AcquisitionReport> {
    let sites = read_targets(&args.targets)?;
    info!(sites = sites.len(), "Target list loaded");

    let store = Arc::new(DirectoryStore::create(store_dir)?);
    let client = Arc::new(BasicClient::with_timeout(Duration::from_secs(args.timeout_secs))?);

    let mut tasks = vec![];

    for (index, shard) in partition(sites, args.workers).into_iter().enumerate() {
        let shard_no = index + 1;
        let client = client.clone();
        let store = store.clone();

        let shard_span = tracing::info_span!("shard", shard = shard_no, sites = shard.len());

        let task = tokio::spawn(
            async move { acquire_shard(client.as_ref(), &shard, &store).await }
                .instrument(shard_span),
        );
        tasks.push(task);
    }

    let mut report = AcquisitionReport::default();
    for task in tasks {
        match task.await {
            Ok(shard_report) => report.merge(shard_report),
            Err(e) => error!(error = %e, "Acquisition worker panicked"),
        }
    }

    write_failures(&args.failures, &report.failures)?;

    info!(
        attempted = report.attempted(),
        stored = report.stored.len(),
        failed = report.failures.len(),
        failures = %args.failures.display(),
        "Acquisition finished"
    );
    Ok(report)
}

/// Runs the aggregator over the store, stopping between sites on Ctrl+C.
#[tracing::instrument(
    skip_all,
    fields(store = %store_dir.display(), output = %args.output.display())
)]
async fn score(store_dir: &Path, args: &ScoreArgs) -> Result<AggregateSummary> {
    let store = DirectoryStore::new(store_dir);

    let lookup: Box<dyn AccessibilityLookup> = if args.no_lookup {
        info!("Accessibility lookup disabled");
        Box::new(Unavailable)
    } else {
        let base_url =
            std::env::var("A11Y_LOOKUP_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let client = BasicClient::with_timeout(Duration::from_secs(args.lookup_timeout_secs))?;
        Box::new(WebAccessibilityClient::new(
            client,
            base_url,
            Duration::from_secs(args.retry_delay_secs),
        ))
    };

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Ctrl+C received, finishing current site");
                stop.store(true, Ordering::Relaxed);
            }
        });
    }

    let order = if args.sorted {
        RecordOrder::ByName
    } else {
        RecordOrder::Listing
    };

    let summary = aggregate(&store, lookup.as_ref(), &args.output, order, &stop).await?;

    let (itaa, ham, lim) = (summary.itaa(), summary.ham(), summary.lim());
    info!(
        rows_written = summary.rows_written,
        unreadable_records = summary.unreadable_records,
        lookups_failed = summary.lookups_failed,
        stopped_early = summary.stopped_early,
        itaa_mean = itaa.mean,
        itaa_stddev = itaa.stddev,
        ham_mean = ham.mean,
        ham_stddev = ham.stddev,
        lim_mean = lim.mean,
        lim_stddev = lim.stddev,
        "Scoring finished"
    );
    Ok(summary)
}
