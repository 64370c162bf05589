//! HTTP client initialization.
//!
//! This module builds the single `reqwest::Client` shared by every worker from
//! the per-run `RequestConfig`.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::ClientBuilder;

use crate::config::{RequestConfig, TCP_CONNECT_TIMEOUT_SECS};
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used by the fetch provider.
///
/// Creates a `reqwest::Client` configured with:
/// - Per-request timeout from the request config
/// - Certificate verification disabled when HTTPS probing is on
/// - Redirect policy from `redirect_policy`
/// - Custom headers applied to every request
/// - Optional proxy for all schemes
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if the proxy is rejected or
/// client creation fails.
pub fn init_client(config: &RequestConfig) -> Result<reqwest::Client, InitializationError> {
    let connect_timeout = Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS).min(config.timeout);

    let mut builder = ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(connect_timeout)
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .redirect(redirect_policy(config))
        .default_headers(config.headers.clone());

    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    Ok(builder.build()?)
}

/// Builds the redirect policy for a request config.
///
/// A redirect that is not followed is not an error: the redirect response
/// itself becomes the reported response.
///
/// - redirects disabled: never follow
/// - otherwise follow at most `max_redirects` hops
/// - with `same_host_only`, stop at the first hop whose host differs from the
///   previous URL's host
pub fn redirect_policy(config: &RequestConfig) -> Policy {
    if !config.follow_redirects || config.max_redirects == 0 {
        return Policy::none();
    }

    let max_redirects = config.max_redirects;
    let same_host_only = config.same_host_only;

    Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            return attempt.stop();
        }
        if same_host_only {
            let previous_host = attempt.previous().last().and_then(|u| u.host_str());
            if previous_host != attempt.url().host_str() {
                return attempt.stop();
            }
        }
        attempt.follow()
    })
}
