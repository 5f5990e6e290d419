use super::common::ColorMode;
use super::config::Config;
use super::environment::EnvironmentArgs;
use super::{Host, ProgressReporter};
use crate::Result;
use crate::facts::{Collector, Progress, hub};
use crate::intake::{ClassificationSession, Entry, InputSource};
use crate::reports::{generate_console, generate_csv, write_ndjson_row};
use crate::scoring::{Registry, ScoreRow, Scorer};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use core::pin::pin;
use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;
use futures_util::stream::{self, StreamExt};
use ohno::IntoAppError;
use std::fs;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

const LOG_TARGET: &str = "      score";
const PROGRESS_DELAY: Duration = Duration::from_millis(300);

#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// A URL, a text file with one comma-separated group of URLs per line, or a JSON file holding an array of URLs
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Path to configuration file (default is `appraise.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Also write one CSV row per entry to this file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub csv: Option<Utf8PathBuf>,

    /// Render a human-readable report on stdout instead of NDJSON
    #[arg(long, help_heading = "Report Output")]
    pub console: bool,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    #[command(flatten)]
    pub environment: EnvironmentArgs,
}

/// Score every model referenced by the input, streaming one row per entry.
pub async fn score_entries<H: Host>(host: &mut H, args: &ScoreArgs) -> Result<()> {
    match score_inner(host, args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = writeln!(host.error(), "{e:#}");
            host.exit(1);
            Err(e)
        }
    }
}

async fn score_inner<H: Host>(host: &mut H, args: &ScoreArgs) -> Result<()> {
    let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
    let hosting = args.environment.establish(&config.github_api_url).await?;

    let source = InputSource::detect(&args.input);
    let entries = ClassificationSession::new().classify(&source)?;

    let collector = Collector::new(hub::Provider::new(config.hub_url.as_str())?, hosting);
    let scorer = Scorer::new(
        Registry::builtin(&config.weights)?,
        config.metric_concurrency,
        config.metric_timeout,
        config.metric_retries,
    );

    let progress = ProgressReporter::new(PROGRESS_DELAY, args.color.for_stderr());
    let started = Instant::now();
    let rows = appraise(host, &collector, &scorer, entries, &config, !args.console, &progress).await;
    progress.done();
    let rows = rows?;

    log::info!(
        target: LOG_TARGET,
        "Scored {} entr{} in {:.1}s",
        rows.len(),
        if rows.len() == 1 { "y" } else { "ies" },
        started.elapsed().as_secs_f64()
    );

    if args.console && !rows.is_empty() {
        let mut text = String::new();
        generate_console(&rows, args.color.for_stdout(), &mut text)?;
        let _ = write!(host.output(), "{text}");
    }

    if let Some(path) = &args.csv {
        let mut text = String::new();
        generate_csv(&rows, &mut text)?;
        fs::write(path, text).into_app_err_with(|| format!("writing CSV report to '{path}'"))?;
    }

    Ok(())
}

/// Collect and score entries concurrently, writing NDJSON rows in input order as they complete.
async fn appraise<H: Host>(
    host: &mut H,
    collector: &Collector,
    scorer: &Scorer,
    entries: Vec<Entry>,
    config: &Config,
    stream_rows: bool,
    progress: &dyn Progress,
) -> Result<Vec<ScoreRow>> {
    let total = entries.len() as u64;
    let finished = Arc::new(AtomicU64::new(0));

    progress.set_phase("Scoring");
    let counter = Arc::clone(&finished);
    progress.set_determinate(Box::new(move || (total, counter.load(Ordering::Relaxed), String::new())));

    let finished = &finished;
    let mut pending = pin!(stream::iter(entries)
        .map(move |entry| async move {
            let facts = collector.collect(entry).await;
            let row = scorer.score(Arc::new(facts)).await;
            let _ = finished.fetch_add(1, Ordering::Relaxed);
            row
        })
        .buffered(config.entry_concurrency.max(1)));

    let mut rows = Vec::new();
    while let Some(row) = pending.next().await {
        if stream_rows {
            write_ndjson_row(&row, &mut host.output())?;
        }
        rows.push(row);
    }

    Ok(rows)
}
