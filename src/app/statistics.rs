//! End-of-run statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, ProcessingStats, SkipReason};

/// Prints skip and provider error counts, then a one-line summary.
pub fn print_final_statistics(stats: &ProcessingStats, total_urls: usize, elapsed_seconds: f64) {
    print_error_statistics(stats);
    print_simple_summary(
        total_urls,
        stats.reported(),
        stats.total_skipped(),
        elapsed_seconds,
    );
}

/// Prints a simple one-line summary of the run.
fn print_simple_summary(total_urls: usize, reported: usize, skipped: usize, elapsed_seconds: f64) {
    info!(
        "Processed {} target{} ({} reported, {} skipped) in {:.1}s",
        total_urls,
        if total_urls == 1 { "" } else { "s" },
        reported,
        skipped,
        elapsed_seconds
    );
}

/// Prints skip reasons and provider error categories with non-zero counts.
pub fn print_error_statistics(stats: &ProcessingStats) {
    let total_skipped = stats.total_skipped();
    let total_errors = stats.total_errors();

    if total_skipped > 0 {
        info!("Skipped Targets ({} total):", total_skipped);
        for reason in SkipReason::iter() {
            let count = stats.get_skip_count(reason);
            if count > 0 {
                info!("   {}: {}", reason.as_str(), count);
            }
        }
    }

    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }
}
