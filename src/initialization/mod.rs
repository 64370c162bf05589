//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - HTTP client (redirect policy, proxy, TLS verification, default headers)
//! - DNS resolvers
//! - Concurrency semaphore
//! - Token-bucket rate limiter
//! - Logger
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;
mod rate_limiter;
mod resolver;

use std::sync::Arc;

use tokio::sync::Semaphore;

// Re-export public API
pub use client::{init_client, redirect_policy};
pub use logger::init_logger_with;
pub use rate_limiter::{init_rate_limiter, RateLimiter};
pub use resolver::init_resolver;

/// Initializes a semaphore for controlling concurrency.
///
/// Creates a new semaphore with the specified permit count. This semaphore is used
/// to limit the number of targets running the enrichment pipeline at once.
///
/// # Arguments
///
/// * `count` - Maximum number of concurrent operations allowed
///
/// # Returns
///
/// An `Arc<Semaphore>` that can be shared across multiple tasks.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_semaphore_permits() {
        let semaphore = init_semaphore(4);
        assert_eq!(semaphore.available_permits(), 4);
    }

    #[test]
    fn test_init_semaphore_never_zero() {
        let semaphore = init_semaphore(0);
        assert_eq!(semaphore.available_permits(), 1);
    }
}
