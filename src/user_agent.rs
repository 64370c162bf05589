//! User-Agent rotation.
//!
//! When random User-Agents are enabled and the caller did not set one
//! explicitly, every request picks a browser string from a small pool.

use rand::seq::IndexedRandom;

use crate::config::DEFAULT_USER_AGENT;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
];

/// Picks a random User-Agent from the pool.
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(DEFAULT_USER_AGENT)
}

/// The User-Agent to send for one request.
pub fn user_agent_for_request(randomize: bool) -> &'static str {
    if randomize {
        random_user_agent()
    } else {
        DEFAULT_USER_AGENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_user_agent_from_pool() {
        for _ in 0..20 {
            assert!(USER_AGENTS.contains(&random_user_agent()));
        }
    }

    #[test]
    fn test_fixed_user_agent_when_not_randomized() {
        assert_eq!(user_agent_for_request(false), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_pool_entries_are_valid_header_values() {
        for ua in USER_AGENTS {
            assert!(reqwest::header::HeaderValue::from_str(ua).is_ok());
        }
    }
}
