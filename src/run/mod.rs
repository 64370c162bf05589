//! Scan orchestration.
//!
//! A run reads targets line by line, takes one rate-limiter token per valid
//! target, and spawns a task that waits for a concurrency slot and runs the
//! enrichment pipeline. Outcomes flow over a channel to a single collector
//! that prints results as they complete. Once every task has drained, the
//! buffered results are optionally persisted.

mod finalize;
mod init;
mod input;
mod resources;
mod sink;
mod task;


use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{info, warn};
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::app::{log_progress, validate_and_normalize_url};
use crate::config::{Config, LOGGING_INTERVAL};
use crate::error_handling::SkipReason;
use crate::models::TargetOutcome;
use crate::pipeline::EnrichmentContext;

pub use input::InputSource;

use init::{build_enrichment_context, init_scan_resources};
use input::{target_line, UrlSource};
use resources::{ScanResources, TargetTaskParams};
use sink::{collect_results, ResultSink};

/// Results of a scan run.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Number of target lines read (blank lines and comments excluded)
    pub total_urls: usize,
    /// Number of results written to the output
    pub reported: usize,
    /// Number of targets that produced no output record
    pub skipped: usize,
    /// Path of the result file, if one was written
    pub result_file: Option<PathBuf>,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// State carried from the scan loop into finalization.
pub(crate) struct ScanLoopResult {
    /// Cancellation token for the logging task
    pub cancel: CancellationToken,
    /// Handle to the logging task
    pub logging_task: Option<tokio::task::JoinHandle<()>>,
    /// Target lines read
    pub total_urls: usize,
}

/// Runs a scan over the input named by `config` (`--urls`, then `--url`),
/// printing results to stdout.
///
/// # Errors
///
/// Returns an error if no input is configured, the input cannot be read, the
/// configuration is invalid, or results cannot be written.
pub async fn run_scan(config: Config) -> Result<ScanReport> {
    let input = InputSource::from_config(&config, false)
        .ok_or_else(|| anyhow!("No input: pass --url, --urls, or pipe targets on stdin"))?;
    run_scan_from(config, input).await
}

/// Runs a scan over an explicit input source, printing results to stdout.
///
/// # Errors
///
/// See [`run_scan`].
pub async fn run_scan_from(config: Config, input: InputSource) -> Result<ScanReport> {
    run_scan_with(config, input, Box::new(tokio::io::stdout())).await
}

/// Runs a scan over `input`, writing one JSON line per result to `out`.
///
/// # Errors
///
/// See [`run_scan`].
pub async fn run_scan_with(
    config: Config,
    input: InputSource,
    out: Box<dyn AsyncWrite + Send + Unpin>,
) -> Result<ScanReport> {
    let ctx = build_enrichment_context(&config)?;
    run_with(&config, &input, ctx, out).await
}

/// Drives one run with the given providers.
pub(crate) async fn run_with(
    config: &Config,
    input: &InputSource,
    ctx: EnrichmentContext,
    out: Box<dyn AsyncWrite + Send + Unpin>,
) -> Result<ScanReport> {
    // Open input before any network activity so a bad path fails cleanly.
    let mut source = input.open().await?;
    let resources = init_scan_resources(config, ctx);

    let channel_capacity = config.worker_count().max(16);
    let (results_tx, results_rx) = mpsc::channel(channel_capacity);
    let collector = tokio::spawn(collect_results(
        ResultSink::new(out, Arc::clone(&resources.stats)),
        results_rx,
    ));

    let cancel = CancellationToken::new();
    let logging_task = Some(spawn_progress_logger(&resources, cancel.child_token()));

    let total_urls = dispatch_and_drain(&mut source, &resources, results_tx).await;

    let sink = collector
        .await
        .context("Result collector task failed")?;

    let loop_result = ScanLoopResult {
        cancel,
        logging_task,
        total_urls,
    };
    finalize::finalize_scan(config, resources, loop_result, sink).await
}

/// Admits every target from `source`, then waits for all tasks.
///
/// Returns the number of target lines read.
async fn dispatch_and_drain(
    source: &mut UrlSource,
    resources: &ScanResources,
    results_tx: mpsc::Sender<TargetOutcome>,
) -> usize {
    let mut tasks = FuturesUnordered::new();
    let mut total_urls = 0usize;

    loop {
        let line = match source.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read line from input: {e}. Stopping admission.");
                break;
            }
        };
        let Some(target) = target_line(&line) else {
            continue;
        };
        total_urls += 1;

        let url = match validate_and_normalize_url(target) {
            Ok(url) => url,
            Err(reason) => {
                let outcome = TargetOutcome::skipped(target, SkipReason::InvalidUrl, reason);
                if results_tx.send(outcome).await.is_err() {
                    warn!("Result collector stopped; abandoning input");
                    break;
                }
                continue;
            }
        };

        if let Some(limiter) = &resources.request_limiter {
            limiter.acquire().await;
        }
        resources.dispatched.fetch_add(1, Ordering::SeqCst);

        let url: Arc<str> = Arc::from(url);
        let params = TargetTaskParams {
            url: Arc::clone(&url),
            ctx: resources.ctx.clone(),
            flags: resources.flags,
            semaphore: Arc::clone(&resources.semaphore),
            deadline: resources.target_deadline,
            results: results_tx.clone(),
        };
        let handle = tokio::spawn(task::process_target_task(params));
        tasks.push(async move { (url, handle.await) });
    }

    info!("Admitted {} targets; draining", resources.dispatched.load(Ordering::SeqCst));

    while let Some((url, task_result)) = tasks.next().await {
        if let Err(join_error) = task_result {
            warn!("Task for {} panicked: {:?}", url.as_ref(), join_error);
            let outcome =
                TargetOutcome::skipped(&url, SkipReason::TaskPanicked, join_error.to_string());
            let _ = results_tx.send(outcome).await;
        }
    }

    total_urls
}

fn spawn_progress_logger(
    resources: &ScanResources,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    let start_time = resources.start_time;
    let dispatched = Arc::clone(&resources.dispatched);
    let stats = Arc::clone(&resources.stats);

    tokio::task::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(LOGGING_INTERVAL));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    log_progress(start_time, dispatched.load(Ordering::SeqCst), &stats);
                }
                _ = cancel.cancelled() => {
                    break;
                }
            }
        }
    })
}
