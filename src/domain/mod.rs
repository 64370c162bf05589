//! Hostname derivation for target URLs.
//!
//! Passive enrichment works on the bare hostname of a target: the scheme,
//! userinfo, port, path, query and fragment are all stripped.

use anyhow::{Context, Result};

/// Extracts the hostname a target URL points at.
///
/// Accepts full URLs as well as scheme-less inputs such as `example.com:8443/x`.
/// IPv6 literals are returned without brackets.
///
/// # Errors
///
/// Returns an error if the input cannot be parsed as a URL or has no host.
pub fn extract_host(target: &str) -> Result<String> {
    let target = target.trim();
    let parsed = if target.contains("://") {
        url::Url::parse(target)
    } else {
        url::Url::parse(&format!("http://{target}"))
    }
    .with_context(|| format!("Failed to parse URL: {target}"))?;

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| anyhow::anyhow!("URL '{}' has no host component", target))?;

    Ok(host
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim_end_matches('.')
        .to_string())
}
