//! Result model for one scanned target.
//!
//! The JSON field names are part of the output contract: one `ScanResult`
//! object per line on stdout and in the result file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error_handling::SkipReason;

/// Facts derived from one HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseInfo {
    /// Effective URL after redirects
    pub url: String,
    pub title: String,
    pub server: String,
    pub via: String,
    #[serde(rename = "x-powered-by")]
    pub power: String,
    pub status_code: u16,
    /// 0 iff the status is 404 or 502, else 1
    pub alive: u8,
    /// Declared `Content-Length`, -1 when the header is absent
    pub content_length: i64,
    /// Bytes actually read from the body
    pub content_length_by_all_body: i64,
    /// Every response header as `"name: value"`
    pub response_header: Vec<String>,
}

/// Facts derived from DNS and ASN lookups, plus the CDN verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveInfo {
    /// CNAME chain, without trailing dots
    pub cname: Vec<String>,
    /// Comma-joined union of resolved addresses
    pub ip: String,
    /// 1 iff any evidence signal fired
    pub cdn: u8,
    pub cdn_by_ip: bool,
    /// `"Header: Value"` for each CDN header present
    pub cdn_by_header: Vec<String>,
    pub cdn_by_cidr: bool,
    pub cdn_by_asn: bool,
    pub cdn_by_cname: bool,
    pub cidr: String,
    pub asn: String,
    pub org: String,
    /// Country of the announcing network
    pub addr: String,
}

/// Body matches from the may-be-vulnerable rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityInfo {
    /// Rule label -> first matching substring
    pub may_vul: BTreeMap<String, String>,
}

/// Aggregate record for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub base_info: BaseInfo,
    pub passive_info: PassiveInfo,
    pub regex_info: VulnerabilityInfo,
}

impl ScanResult {
    /// True iff every field of every sub-record holds its zero value.
    pub fn is_empty(&self) -> bool {
        *self == ScanResult::default()
    }
}

/// What the pipeline produced for one target.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetOutcome {
    /// A non-empty result to hand to the sink.
    Reported(Box<ScanResult>),
    /// The target produced no output record.
    Skipped {
        url: String,
        reason: SkipReason,
        detail: String,
    },
}

impl TargetOutcome {
    pub(crate) fn skipped(url: &str, reason: SkipReason, detail: impl Into<String>) -> Self {
        TargetOutcome::Skipped {
            url: url.to_string(),
            reason,
            detail: detail.into(),
        }
    }

    /// Wraps a result, turning an all-zero result into `Skipped(EmptyResult)`.
    pub(crate) fn from_result(url: &str, result: ScanResult) -> Self {
        if result.is_empty() {
            Self::skipped(url, SkipReason::EmptyResult, "no field was populated")
        } else {
            TargetOutcome::Reported(Box::new(result))
        }
    }
}
