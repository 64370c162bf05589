//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration, plus the immutable per-run `RequestConfig` shared by all
//! workers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;

use crate::config::constants::{
    CDN_ASN_FILE, CDN_CIDR_FILE, CDN_CNAME_FILE, CDN_HEADER_KEYS_FILE, CDN_IP_RANGES_FILE,
    DEFAULT_DATA_DIR, DEFAULT_RESULT_FILE, DNS_ATTEMPTS, DNS_TIMEOUT_SECS, MAX_REDIRECT_HOPS,
    MAY_VUL_RULES_FILE, RESOLVERS_FILE, TARGET_DEADLINE_SLACK,
};
use crate::error_handling::InitializationError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Scan configuration.
///
/// Parsed from the command line by the binary, or constructed programmatically
/// with `..Default::default()` by library users.
///
/// # Examples
///
/// ```no_run
/// use edge_status::Config;
///
/// let config = Config {
///     url: Some("https://example.com".to_string()),
///     passive: true,
///     processes: 10,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "edge_status",
    about = "Probes URLs, enriches them with DNS/ASN data and flags CDN-fronted endpoints."
)]
pub struct Config {
    /// Single URL to process
    #[arg(long)]
    pub url: Option<String>,

    /// File of newline-delimited URLs to process
    #[arg(long)]
    pub urls: Option<PathBuf>,

    /// Proxy URL used for HTTP fetches
    #[arg(long)]
    pub proxy: Option<String>,

    /// Accept any TLS certificate when connecting over HTTPS
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub use_https: bool,

    /// Follow HTTP redirects
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub follow_redirects: bool,

    /// Maximum number of redirect hops
    #[arg(long, default_value_t = MAX_REDIRECT_HOPS)]
    pub max_redirects: usize,

    /// HTTP request method
    #[arg(long, default_value = "GET")]
    pub method: String,

    /// Pick a random browser User-Agent per request
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub random_user_agent: bool,

    /// Custom request header as "Name: Value" (repeatable)
    #[arg(long = "header")]
    pub headers: Vec<String>,

    /// Only follow redirects that stay on the same host
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub follow_same_host: bool,

    /// Per-request timeout in seconds
    #[arg(long = "timeout", default_value_t = 10)]
    pub timeout_seconds: u64,

    /// Worker pool size (maximum concurrent targets)
    #[arg(long, default_value_t = 1)]
    pub processes: usize,

    /// Requests per second dispatched across the whole run (0 disables limiting)
    #[arg(long, default_value_t = 50)]
    pub rate_limit: u32,

    /// Persist results to the result file
    #[arg(long, default_value_t = false)]
    pub save: bool,

    /// Result file path (truncated on every run)
    #[arg(long, default_value = DEFAULT_RESULT_FILE)]
    pub result_file: PathBuf,

    /// Enable passive enrichment (DNS, ASN, CDN classification)
    #[arg(long, default_value_t = false)]
    pub passive: bool,

    /// Collect base response information (title, banner, status)
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub base: bool,

    /// Scan response bodies with the may-be-vulnerable rule table
    #[arg(long, default_value_t = false)]
    pub may_vul: bool,

    /// Directory holding the reference tables
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// MaxMind GeoLite2-ASN database (.mmdb)
    #[arg(long)]
    pub asn_db: Option<PathBuf>,

    /// MaxMind GeoLite2-Country or City database (.mmdb)
    #[arg(long)]
    pub country_db: Option<PathBuf>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            urls: None,
            proxy: None,
            use_https: true,
            follow_redirects: true,
            max_redirects: MAX_REDIRECT_HOPS,
            method: "GET".to_string(),
            random_user_agent: true,
            headers: Vec::new(),
            follow_same_host: true,
            timeout_seconds: 10,
            processes: 1,
            rate_limit: 50,
            save: false,
            result_file: PathBuf::from(DEFAULT_RESULT_FILE),
            passive: false,
            base: true,
            may_vul: false,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            asn_db: None,
            country_db: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Builds the immutable request configuration shared by all workers.
    ///
    /// # Errors
    ///
    /// Returns an `InitializationError` if the method, a custom header or the
    /// proxy address cannot be parsed.
    pub fn request_config(&self) -> Result<RequestConfig, InitializationError> {
        let method = Method::from_bytes(self.method.trim().to_uppercase().as_bytes())
            .map_err(|_| InitializationError::InvalidMethod(self.method.clone()))?;

        let mut headers = HeaderMap::new();
        for raw in &self.headers {
            let (name, value) = parse_header(raw)?;
            headers.append(name, value);
        }

        let proxy = match self.proxy.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => {
                url::Url::parse(p)
                    .map_err(|e| InitializationError::InvalidProxy(format!("{p}: {e}")))?;
                Some(p.to_string())
            }
            _ => None,
        };

        let max_redirects = if self.follow_redirects && self.max_redirects == 0 {
            MAX_REDIRECT_HOPS
        } else {
            self.max_redirects
        };

        Ok(RequestConfig {
            proxy,
            accept_invalid_certs: self.use_https,
            follow_redirects: self.follow_redirects,
            max_redirects,
            method,
            random_user_agent: self.random_user_agent,
            headers,
            same_host_only: self.follow_same_host,
            timeout: Duration::from_secs(self.timeout_seconds.max(1)),
        })
    }

    /// Worker pool size, never below one.
    pub fn worker_count(&self) -> usize {
        self.processes.max(1)
    }

    /// Upper bound on the time one target may spend in the pipeline.
    ///
    /// Covers one fetch plus the two DNS resolutions and the ASN lookup.
    pub fn target_deadline(&self) -> Duration {
        let fetch = Duration::from_secs(self.timeout_seconds.max(1));
        let dns = Duration::from_secs(DNS_TIMEOUT_SECS * DNS_ATTEMPTS as u64);
        fetch * 2 + dns * 2 + TARGET_DEADLINE_SLACK
    }

    /// Paths of the reference data files.
    pub fn data_files(&self) -> DataFiles {
        DataFiles::in_dir(&self.data_dir)
    }
}

fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), InitializationError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| InitializationError::InvalidHeader(raw.to_string()))?;
    let name = HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|_| InitializationError::InvalidHeader(raw.to_string()))?;
    let value = HeaderValue::from_str(value.trim())
        .map_err(|_| InitializationError::InvalidHeader(raw.to_string()))?;
    Ok((name, value))
}

/// Immutable per-run HTTP request configuration.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Proxy URL, if any
    pub proxy: Option<String>,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
    /// Follow redirects at all
    pub follow_redirects: bool,
    /// Maximum redirect hops
    pub max_redirects: usize,
    /// Request method
    pub method: Method,
    /// Rotate User-Agent per request
    pub random_user_agent: bool,
    /// Custom request headers
    pub headers: HeaderMap,
    /// Stop at the first redirect that leaves the current host
    pub same_host_only: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            accept_invalid_certs: true,
            follow_redirects: true,
            max_redirects: MAX_REDIRECT_HOPS,
            method: Method::GET,
            random_user_agent: true,
            headers: HeaderMap::new(),
            same_host_only: true,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Locations of the reference tables.
#[derive(Debug, Clone)]
pub struct DataFiles {
    /// CDN header names
    pub cdn_headers: PathBuf,
    /// CDN CIDR blocks
    pub cdn_cidrs: PathBuf,
    /// CDN ASNs
    pub cdn_asns: PathBuf,
    /// CDN CNAME -> provider map
    pub cdn_cnames: PathBuf,
    /// CDN provider -> IP ranges
    pub cdn_ip_ranges: PathBuf,
    /// Vulnerability rule table
    pub may_vul_rules: PathBuf,
    /// DNS resolver list
    pub resolvers: PathBuf,
}

impl DataFiles {
    /// Standard file names under `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            cdn_headers: dir.join(CDN_HEADER_KEYS_FILE),
            cdn_cidrs: dir.join(CDN_CIDR_FILE),
            cdn_asns: dir.join(CDN_ASN_FILE),
            cdn_cnames: dir.join(CDN_CNAME_FILE),
            cdn_ip_ranges: dir.join(CDN_IP_RANGES_FILE),
            may_vul_rules: dir.join(MAY_VUL_RULES_FILE),
            resolvers: dir.join(RESOLVERS_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.use_https);
        assert!(config.follow_redirects);
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.method, "GET");
        assert!(config.random_user_agent);
        assert!(config.follow_same_host);
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.processes, 1);
        assert_eq!(config.rate_limit, 50);
        assert!(!config.save);
        assert_eq!(config.result_file, PathBuf::from("./result.json"));
        assert!(!config.passive);
        assert!(config.base);
        assert!(!config.may_vul);
    }

    #[test]
    fn test_cli_defaults_match_default_impl() {
        let parsed = Config::parse_from(["edge_status", "--url", "example.com"]);
        let default = Config::default();
        assert_eq!(parsed.url.as_deref(), Some("example.com"));
        assert_eq!(parsed.use_https, default.use_https);
        assert_eq!(parsed.max_redirects, default.max_redirects);
        assert_eq!(parsed.rate_limit, default.rate_limit);
        assert_eq!(parsed.processes, default.processes);
        assert_eq!(parsed.result_file, default.result_file);
        assert_eq!(parsed.passive, default.passive);
    }

    #[test]
    fn test_cli_boolean_toggles_take_values() {
        let parsed = Config::parse_from([
            "edge_status",
            "--use-https",
            "false",
            "--follow-same-host",
            "false",
            "--passive",
            "--save",
        ]);
        assert!(!parsed.use_https);
        assert!(!parsed.follow_same_host);
        assert!(parsed.passive);
        assert!(parsed.save);
    }

    #[test]
    fn test_request_config_parses_headers_and_method() {
        let config = Config {
            method: "post".to_string(),
            headers: vec!["X-Test: abc".to_string(), "User-Agent: edge-test/1.0".to_string()],
            ..Default::default()
        };
        let request = config.request_config().expect("valid config");
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.headers.get("x-test").unwrap(), "abc");
        assert_eq!(request.headers.get("user-agent").unwrap(), "edge-test/1.0");
        assert!(request.accept_invalid_certs);
    }

    #[test]
    fn test_request_config_rejects_bad_header() {
        let config = Config {
            headers: vec!["no-colon-here".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            config.request_config(),
            Err(InitializationError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_request_config_rejects_bad_proxy() {
        let config = Config {
            proxy: Some("not a proxy".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.request_config(),
            Err(InitializationError::InvalidProxy(_))
        ));
    }

    #[test]
    fn test_request_config_zero_redirects_with_follow_defaults_to_ten() {
        let config = Config {
            max_redirects: 0,
            ..Default::default()
        };
        assert_eq!(config.request_config().unwrap().max_redirects, 10);
    }

    #[test]
    fn test_worker_count_never_zero() {
        let config = Config {
            processes: 0,
            ..Default::default()
        };
        assert_eq!(config.worker_count(), 1);
    }

    #[test]
    fn test_data_files_layout() {
        let files = DataFiles::in_dir(Path::new("/tmp/data"));
        assert_eq!(files.cdn_cnames, PathBuf::from("/tmp/data/cdn_cname_keywords.json"));
        assert_eq!(files.may_vul_rules, PathBuf::from("/tmp/data/regex_MayVul.json"));
        assert_eq!(files.resolvers, PathBuf::from("/tmp/data/resolvers.txt"));
    }
}
