//! Rate limiter initialization.
//!
//! This module provides a token-bucket rate limiter for controlling the
//! aggregate dispatch rate of a run.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Duration, Instant};

/// Token-bucket rate limiter for controlling request rate.
///
/// Tokens are issued at a fixed interval of `1 / rps` seconds. The bucket holds
/// at most `burst` tokens, so with the default burst of one every acquisition
/// is spaced by exactly one interval from the previous one.
///
/// # Behavior
///
/// - Tokens are granted in strict FIFO order of `acquire` calls
/// - Idle time refills the bucket up to `burst`, never beyond
/// - No background task: the next grant time is computed on acquisition
pub struct RateLimiter {
    interval: Duration,
    tolerance: Duration,
    // theoretical arrival time of the next token
    next_slot: Mutex<Instant>,
    rps: u32,
}

impl RateLimiter {
    /// Waits until a token is available and consumes it.
    pub async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let tat = (*next).max(now);
            let slot = tat
                .checked_sub(self.tolerance)
                .map_or(now, |earliest| earliest.max(now));
            *next = tat + self.interval;
            slot
        };
        sleep_until(slot).await;
    }

    /// Configured requests per second.
    pub fn rps(&self) -> u32 {
        self.rps
    }

    /// Time between two consecutive tokens.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Initializes a token-bucket rate limiter.
///
/// If `rps` is 0, rate limiting is disabled and `None` is returned.
///
/// # Arguments
///
/// * `rps` - Requests per second (0 disables rate limiting)
/// * `burst` - Bucket capacity (values below one are treated as one)
pub fn init_rate_limiter(rps: u32, burst: u32) -> Option<Arc<RateLimiter>> {
    if rps == 0 {
        return None;
    }
    let interval = Duration::from_secs(1) / rps;
    let tolerance = interval * burst.max(1).saturating_sub(1);

    Some(Arc::new(RateLimiter {
        interval,
        tolerance,
        next_slot: Mutex::new(Instant::now()),
        rps,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_rate_limiter_disabled() {
        assert!(
            init_rate_limiter(0, 1).is_none(),
            "Rate limiter should be disabled when RPS is 0"
        );
    }

    #[tokio::test]
    async fn test_init_rate_limiter_interval() {
        let limiter = init_rate_limiter(50, 1).unwrap();
        assert_eq!(limiter.rps(), 50);
        assert_eq!(limiter.interval(), Duration::from_millis(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokens_are_evenly_spaced() {
        let limiter = init_rate_limiter(10, 1).unwrap();
        let start = Instant::now();

        let mut grants = Vec::new();
        for _ in 0..5 {
            limiter.acquire().await;
            grants.push(Instant::now() - start);
        }

        assert_eq!(grants[0], Duration::ZERO);
        for pair in grants.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::from_millis(100));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_more_than_rps_in_one_second() {
        let limiter = init_rate_limiter(5, 1).unwrap();
        let start = Instant::now();

        let mut within_first_second = 0;
        for _ in 0..20 {
            limiter.acquire().await;
            if Instant::now() - start < Duration::from_secs(1) {
                within_first_second += 1;
            }
        }
        assert_eq!(within_first_second, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_capacity() {
        let limiter = init_rate_limiter(1, 3).unwrap();
        let start = Instant::now();

        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert_eq!(Instant::now() - start, Duration::ZERO);

        limiter.acquire().await;
        assert_eq!(Instant::now() - start, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_time_does_not_accumulate_beyond_burst() {
        let limiter = init_rate_limiter(10, 1).unwrap();
        limiter.acquire().await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        let resumed = Instant::now();

        limiter.acquire().await;
        assert_eq!(Instant::now(), resumed);
        limiter.acquire().await;
        assert_eq!(Instant::now() - resumed, Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_acquirers_share_the_rate() {
        let limiter = init_rate_limiter(10, 1).unwrap();
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                Instant::now()
            }));
        }

        let mut times = Vec::new();
        for handle in handles {
            times.push(handle.await.unwrap() - start);
        }
        times.sort();
        assert_eq!(
            times,
            vec![
                Duration::ZERO,
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(300)
            ]
        );
    }
}
