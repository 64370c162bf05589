//! Per-target task processing.
//!
//! This module contains the logic for running one target through the
//! enrichment pipeline inside a concurrency slot and under a deadline.

use log::warn;

use crate::error_handling::SkipReason;
use crate::models::TargetOutcome;
use crate::pipeline::enrich_target;

use super::resources::TargetTaskParams;

/// Process a single target.
///
/// This function is spawned as a Tokio task for each admitted target. It:
/// - Waits for a concurrency slot (released on every exit path when the permit drops)
/// - Runs the enrichment pipeline under the per-target deadline
/// - Hands the outcome to the result collector
pub async fn process_target_task(params: TargetTaskParams) {
    let TargetTaskParams {
        url,
        ctx,
        flags,
        semaphore,
        deadline,
        results,
    } = params;

    let outcome = match semaphore.acquire_owned().await {
        Ok(_permit) => {
            match tokio::time::timeout(deadline, enrich_target(&ctx, &url, flags)).await {
                Ok(outcome) => outcome,
                Err(_) => TargetOutcome::skipped(
                    &url,
                    SkipReason::Timeout,
                    format!("no outcome within {}s", deadline.as_secs()),
                ),
            }
        }
        Err(_) => TargetOutcome::skipped(&url, SkipReason::TaskPanicked, "worker pool closed"),
    };

    if results.send(outcome).await.is_err() {
        warn!("Result collector stopped before {} was reported", url.as_ref());
    }
}
