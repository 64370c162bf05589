//! Progress logging utilities.

use log::info;

use crate::error_handling::ProcessingStats;

/// Logs progress information about target processing.
///
/// # Arguments
///
/// * `start_time` - The start time of the run
/// * `dispatched` - Targets admitted so far
/// * `stats` - Shared counters updated by the result collector
pub fn log_progress(start_time: std::time::Instant, dispatched: usize, stats: &ProcessingStats) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let completed = stats.reported() + stats.total_skipped();
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Processed {}/{} targets ({} reported, {} skipped) in {:.2} seconds (~{:.2} targets/sec)",
        completed,
        dispatched,
        stats.reported(),
        stats.total_skipped(),
        elapsed_secs,
        rate
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::SkipReason;

    #[test]
    fn test_log_progress_does_not_panic_at_start() {
        let stats = ProcessingStats::new();
        log_progress(std::time::Instant::now(), 0, &stats);
    }

    #[test]
    fn test_log_progress_with_counts() {
        let stats = ProcessingStats::new();
        stats.increment_reported();
        stats.increment_skip(SkipReason::FetchFailed);
        log_progress(std::time::Instant::now(), 3, &stats);
    }
}
