//! Scan resources and state management.
//!
//! This module defines the `ScanResources` struct which holds all initialized
//! resources needed for a scan, and the parameters handed to each task.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};

use crate::error_handling::ProcessingStats;
use crate::initialization::RateLimiter;
use crate::models::TargetOutcome;
use crate::pipeline::{EnrichmentContext, EnrichmentFlags};

/// All resources initialized for a scan operation.
pub struct ScanResources {
    /// Providers, reference tables and counters shared by every target
    pub ctx: EnrichmentContext,
    /// Stages requested for every target
    pub flags: EnrichmentFlags,

    // Throughput control
    /// Concurrency semaphore sized to the worker count
    pub semaphore: Arc<Semaphore>,
    /// Optional rate limiter, consumed once per dispatched target
    pub request_limiter: Option<Arc<RateLimiter>>,
    /// Upper bound on one target's pipeline
    pub target_deadline: Duration,

    /// Shared statistics (same instance as `ctx.stats`)
    pub stats: Arc<ProcessingStats>,
    /// Targets admitted so far
    pub dispatched: Arc<AtomicUsize>,
    /// Start time for elapsed time calculations
    pub start_time: std::time::Instant,
}

/// Parameters for processing a single target.
pub struct TargetTaskParams {
    /// The normalized URL
    pub url: Arc<str>,
    /// Shared enrichment context
    pub ctx: EnrichmentContext,
    /// Stages to run
    pub flags: EnrichmentFlags,
    /// Concurrency pool; a permit is held for the pipeline's lifetime
    pub semaphore: Arc<Semaphore>,
    /// Upper bound on the pipeline
    pub deadline: Duration,
    /// Channel to the result collector
    pub results: mpsc::Sender<TargetOutcome>,
}
