//! Base facts derived from one HTTP response.

use reqwest::header::{HeaderMap, CONTENT_LENGTH};

use super::html::extract_title;
use super::FetchedResponse;
use crate::config::{HEADER_SERVER, HEADER_VIA, HEADER_X_POWERED_BY};
use crate::models::BaseInfo;

/// Liveness rule: 0 iff the status is 404 or 502, else 1.
pub fn is_alive(status: u16) -> u8 {
    match status {
        404 | 502 => 0,
        _ => 1,
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).trim().to_string())
        .unwrap_or_default()
}

fn declared_content_length(headers: &HeaderMap) -> i64 {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(-1)
}

/// Builds the `BaseInfo` record for a response.
pub fn base_info(response: &FetchedResponse) -> BaseInfo {
    let response_header = response
        .headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, String::from_utf8_lossy(value.as_bytes())))
        .collect();

    BaseInfo {
        url: response.url.clone(),
        title: extract_title(&response.body_text()),
        server: header_value(&response.headers, HEADER_SERVER),
        via: header_value(&response.headers, HEADER_VIA),
        power: header_value(&response.headers, HEADER_X_POWERED_BY),
        status_code: response.status,
        alive: is_alive(response.status),
        content_length: declared_content_length(&response.headers),
        content_length_by_all_body: i64::try_from(response.body.len()).unwrap_or(i64::MAX),
        response_header,
    }
}
