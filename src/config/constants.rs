//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the application,
//! including timeouts, size limits, and reference data file names.

use std::time::Duration;

/// Progress log interval in seconds while a run drains
pub const LOGGING_INTERVAL: u64 = 5;

/// Default result file used when `--save` is set without `--result-file`
pub const DEFAULT_RESULT_FILE: &str = "./result.json";

/// Default directory holding the reference tables
pub const DEFAULT_DATA_DIR: &str = "./data";

// Network operation timeouts
/// DNS query timeout in seconds
/// Most DNS queries complete in <1s, 3s fails fast on unresponsive resolvers
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// DNS attempts per query
pub const DNS_ATTEMPTS: usize = 2;
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Slack added to the per-target deadline on top of the fetch and DNS budgets
pub const TARGET_DEADLINE_SLACK: Duration = Duration::from_secs(5);

/// Fallback User-Agent when random User-Agents are disabled and none is given.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Response and body size limits
/// Maximum response body size in bytes kept for title extraction and rule
/// matching (2MB). The full length is still reported.
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

// Redirect handling
/// Default maximum number of redirect hops to follow
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Maximum URL length accepted from input (matches common server limits)
pub const MAX_URL_LENGTH: usize = 2048;

// Reference data file names (relative to the data directory)
/// JSON array of header names indicative of CDN fronting
pub const CDN_HEADER_KEYS_FILE: &str = "cdn_header_keys.json";
/// JSON array of known CDN CIDR blocks
pub const CDN_CIDR_FILE: &str = "cdn_ip_cidr.json";
/// JSON array of known CDN ASNs
pub const CDN_ASN_FILE: &str = "cdn_asn_list.json";
/// JSON object mapping CNAME suffix -> provider name
pub const CDN_CNAME_FILE: &str = "cdn_cname_keywords.json";
/// JSON object mapping provider -> list of CIDR ranges (IP intelligence)
pub const CDN_IP_RANGES_FILE: &str = "cdn_ip_ranges.json";
/// JSON object mapping rule label -> regular expression
pub const MAY_VUL_RULES_FILE: &str = "regex_MayVul.json";
/// Newline-delimited list of DNS resolver addresses
pub const RESOLVERS_FILE: &str = "resolvers.txt";
