//! Error categorization.
//!
//! Maps provider failures onto the `ErrorType` counters reported at the end of a run.

use super::stats::ProcessingStats;
use super::types::{ErrorType, FetchError};

/// Categorizes a `reqwest::Error` into an `ErrorType`.
///
/// Status codes are never errors here: the fetch provider reports every
/// response, so only transport failures reach this function.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if error.is_builder() {
        ErrorType::HttpRequestBuilderError
    } else if error.is_redirect() {
        ErrorType::HttpRequestRedirectError
    } else if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_body() {
        ErrorType::HttpRequestBodyError
    } else if error.is_decode() {
        ErrorType::HttpRequestDecodeError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

/// Categorizes a fetch provider error.
pub fn categorize_fetch_error(error: &FetchError) -> ErrorType {
    match error {
        FetchError::InvalidUrl(_) => ErrorType::HttpRequestBuilderError,
        FetchError::Request(e) => categorize_reqwest_error(e),
    }
}

/// Updates processing statistics based on a fetch error.
pub fn update_error_stats(stats: &ProcessingStats, error: &FetchError) {
    stats.increment_error(categorize_fetch_error(error));
}
