//! Processing statistics tracking.
//!
//! This module provides thread-safe statistics tracking for skipped targets
//! and provider errors during a run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{ErrorType, SkipReason};

/// Thread-safe processing statistics tracker.
///
/// Tracks skip reasons and provider error categories using atomic counters,
/// allowing concurrent access from multiple tasks. All counters are
/// initialized to zero on creation.
pub struct ProcessingStats {
    skips: HashMap<SkipReason, AtomicUsize>,
    errors: HashMap<ErrorType, AtomicUsize>,
    reported: AtomicUsize,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    pub fn new() -> Self {
        let skips = SkipReason::iter()
            .map(|reason| (reason, AtomicUsize::new(0)))
            .collect();
        let errors = ErrorType::iter()
            .map(|error| (error, AtomicUsize::new(0)))
            .collect();

        ProcessingStats {
            skips,
            errors,
            reported: AtomicUsize::new(0),
        }
    }

    /// Increment the counter for a skipped target.
    pub fn increment_skip(&self, reason: SkipReason) {
        if let Some(counter) = self.skips.get(&reason) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment skip counter for {:?} which is not in the map. \
                 This indicates a bug in ProcessingStats initialization.",
                reason
            );
        }
    }

    /// Increment an error counter.
    pub fn increment_error(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map. \
                 This indicates a bug in ProcessingStats initialization.",
                error
            );
        }
    }

    /// Record one reported result.
    pub fn increment_reported(&self) {
        self.reported.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the count for a skip reason.
    pub fn get_skip_count(&self, reason: SkipReason) -> usize {
        self.skips
            .get(&reason)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get the count for an error type.
    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Number of results reported to the sink.
    pub fn reported(&self) -> usize {
        self.reported.load(Ordering::SeqCst)
    }

    /// Get total skip count across all reasons.
    pub fn total_skipped(&self) -> usize {
        SkipReason::iter().map(|r| self.get_skip_count(r)).sum()
    }

    /// Get total error count across all error types.
    pub fn total_errors(&self) -> usize {
        ErrorType::iter().map(|e| self.get_error_count(e)).sum()
    }
}
