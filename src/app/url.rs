//! URL validation and normalization utilities.

use crate::config::MAX_URL_LENGTH;

/// Validates and normalizes one input target.
///
/// Adds an `https://` prefix when the target carries no scheme, then checks
/// that the result parses, uses http/https and names a host. Targets longer
/// than `MAX_URL_LENGTH` (before or after normalization) are rejected.
///
/// # Returns
///
/// The normalized URL, or a short description of why the target was rejected.
/// Logging is left to the caller, which knows the input line.
pub fn validate_and_normalize_url(url: &str) -> Result<String, String> {
    let url = url.trim();
    if url.is_empty() {
        return Err("empty target".to_string());
    }
    if url.len() > MAX_URL_LENGTH {
        return Err(format!(
            "target exceeds maximum length ({} > {})",
            url.len(),
            MAX_URL_LENGTH
        ));
    }

    let normalized = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    if normalized.len() > MAX_URL_LENGTH {
        return Err(format!(
            "normalized target exceeds maximum length ({} > {})",
            normalized.len(),
            MAX_URL_LENGTH
        ));
    }

    let parsed = url::Url::parse(&normalized).map_err(|e| format!("unparseable URL: {e}"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme {other:?}")),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err("URL has no host".to_string());
    }

    Ok(normalized)
}
