//! Scan finalization and cleanup.
//!
//! This module contains the `finalize_scan` function which handles cleanup,
//! persistence and result aggregation after every task has drained.

use std::sync::atomic::Ordering;

use anyhow::Result;
use log::info;

use crate::app::{log_progress, print_final_statistics, shutdown_gracefully};
use crate::config::Config;

use super::sink::{persist_results, ResultSink};
use super::{ScanLoopResult, ScanReport, ScanResources};

/// Finalize a scan run and produce the final report.
///
/// This function performs the following finalization steps:
/// 1. Shut down the progress logging task
/// 2. Log final progress
/// 3. Surface any output write error from the collector
/// 4. Persist the buffered results when saving was requested
/// 5. Print skip and error statistics
///
/// # Errors
///
/// Returns an error if writing to the output stream or the result file failed.
pub async fn finalize_scan(
    config: &Config,
    resources: ScanResources,
    loop_result: ScanLoopResult,
    sink: ResultSink,
) -> Result<ScanReport> {
    let ScanLoopResult {
        cancel,
        logging_task,
        total_urls,
    } = loop_result;

    shutdown_gracefully(cancel, logging_task).await;

    let dispatched = resources.dispatched.load(Ordering::SeqCst);
    log_progress(resources.start_time, dispatched, &resources.stats);

    let buffer = sink.finish()?;

    let result_file = if config.save && !buffer.is_empty() {
        persist_results(&config.result_file, &buffer).await?;
        info!("Results saved to {}", config.result_file.display());
        Some(config.result_file.clone())
    } else {
        None
    };

    let elapsed_seconds = resources.start_time.elapsed().as_secs_f64();
    print_final_statistics(&resources.stats, total_urls, elapsed_seconds);

    Ok(ScanReport {
        total_urls,
        reported: resources.stats.reported(),
        skipped: resources.stats.total_skipped(),
        result_file,
        elapsed_seconds,
    })
}
