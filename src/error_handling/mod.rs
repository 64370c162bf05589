//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions for initialization, reference data, fetches and DNS
//! - Explicit skip reasons for targets that produce no record
//! - Processing statistics tracking (skips, provider errors, reported results)
//! - Error categorization from `reqwest` errors

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::update_error_stats;
pub use stats::ProcessingStats;
pub use types::{
    DnsError, ErrorType, FetchError, InitializationError, ReferenceDataError, SkipReason,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_processing_stats_initialization() {
        let stats = ProcessingStats::new();
        for reason in SkipReason::iter() {
            assert_eq!(stats.get_skip_count(reason), 0);
        }
        for error_type in ErrorType::iter() {
            assert_eq!(stats.get_error_count(error_type), 0);
        }
        assert_eq!(stats.reported(), 0);
    }

    #[test]
    fn test_processing_stats_increment() {
        let stats = ProcessingStats::new();
        stats.increment_skip(SkipReason::Unresolved);
        stats.increment_skip(SkipReason::Unresolved);
        stats.increment_skip(SkipReason::FetchFailed);
        stats.increment_error(ErrorType::DnsIpLookupError);
        stats.increment_reported();

        assert_eq!(stats.get_skip_count(SkipReason::Unresolved), 2);
        assert_eq!(stats.total_skipped(), 3);
        assert_eq!(stats.total_errors(), 1);
        assert_eq!(stats.reported(), 1);
    }

    #[test]
    fn test_processing_stats_concurrent_increments() {
        let stats = std::sync::Arc::new(ProcessingStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = std::sync::Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        stats.increment_skip(SkipReason::Timeout);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.get_skip_count(SkipReason::Timeout), 800);
    }
}
