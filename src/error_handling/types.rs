//! Error type definitions.
//!
//! This module defines the error enums used at module seams, plus the skip
//! reasons and error categories counted during a run.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The configured HTTP method is not a valid token.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// A custom header is not of the form `Name: Value`.
    #[error("Invalid custom header (expected \"Name: Value\"): {0}")]
    InvalidHeader(String),

    /// The proxy address cannot be parsed as a URL.
    #[error("Invalid proxy address: {0}")]
    InvalidProxy(String),
}

/// Error types for reference table loading.
#[derive(Error, Debug)]
pub enum ReferenceDataError {
    /// The table file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Table path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The table file is not valid JSON of the expected shape.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Table path
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// A MaxMind database cannot be opened.
    #[error("Failed to open database {path}: {message}")]
    Database {
        /// Database path
        path: PathBuf,
        /// Reader error
        message: String,
    },

    /// A rule pattern does not compile.
    #[error("Invalid pattern for rule {label:?}: {source}")]
    InvalidRule {
        /// Rule label
        label: String,
        /// Regex compile error
        source: regex::Error,
    },
}

/// Error types for the HTTP fetch provider.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The target is not a valid absolute URL.
    #[error("Invalid URL {0}")]
    InvalidUrl(String),

    /// Transport-level failure (connect, timeout, redirect, TLS, body read).
    #[error("Request failed: {0}")]
    Request(#[from] ReqwestError),
}

/// Error type for the DNS evidence providers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    /// The lookup failed for a reason other than "no records".
    #[error("DNS lookup for {host} failed: {message}")]
    Lookup {
        /// Queried hostname
        host: String,
        /// Resolver error text
        message: String,
    },
}

/// Why a target produced no output record.
///
/// Distinguishes "could not be scanned at all" from a real result, replacing
/// the zero-valued result sentinel with an explicit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum SkipReason {
    /// The input line is not a usable URL
    InvalidUrl,
    /// The HTTP fetch failed
    FetchFailed,
    /// Passive enrichment resolved zero IPs for the hostname
    Unresolved,
    /// Every field of the assembled result is zero-valued
    EmptyResult,
    /// The per-target deadline expired
    Timeout,
    /// The worker task panicked
    TaskPanicked,
    /// The result could not be serialized
    SerializationFailed,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SkipReason {
    /// Returns a human-readable string representation of the skip reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::InvalidUrl => "invalid URL",
            SkipReason::FetchFailed => "fetch failed",
            SkipReason::Unresolved => "no IP resolved",
            SkipReason::EmptyResult => "empty result",
            SkipReason::Timeout => "target deadline exceeded",
            SkipReason::TaskPanicked => "worker task panicked",
            SkipReason::SerializationFailed => "serialization failed",
        }
    }
}

/// Categories of provider errors observed during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // HTTP/Network errors
    HttpRequestTimeoutError,
    HttpRequestConnectError,
    HttpRequestRedirectError,
    HttpRequestBodyError,
    HttpRequestDecodeError,
    HttpRequestBuilderError,
    HttpRequestOtherError,
    // DNS errors
    DnsIpLookupError,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Returns a human-readable string representation of the error type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestRedirectError => "HTTP request redirect error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestDecodeError => "HTTP request decode error",
            ErrorType::HttpRequestBuilderError => "HTTP request builder error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::DnsIpLookupError => "DNS IP lookup error",
        }
    }
}
