//! HTTP evidence provider.
//!
//! This module performs the single HTTP request a target needs and derives
//! the base facts (title, banner headers, liveness, lengths) from it:
//! - `Fetcher` is the seam the pipeline calls through
//! - `HttpFetcher` is the reqwest-backed implementation
//! - `base_info` turns a `FetchedResponse` into a `BaseInfo`

mod html;
mod response;

use futures::future::BoxFuture;
use reqwest::header::{HeaderMap, USER_AGENT};
use reqwest::Method;

use crate::config::{RequestConfig, MAX_RESPONSE_BODY_SIZE};
use crate::error_handling::FetchError;
use crate::user_agent::user_agent_for_request;

pub use response::base_info;

/// One HTTP response, fully read.
#[derive(Debug, Clone, Default)]
pub struct FetchedResponse {
    /// Effective URL after redirects
    pub url: String,
    pub status: u16,
    pub headers: HeaderMap,
    /// Body bytes, capped at `MAX_RESPONSE_BODY_SIZE`
    pub body: Vec<u8>,
}

impl FetchedResponse {
    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Performs the HTTP request for one target.
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and reads the whole response.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<FetchedResponse, FetchError>>;
}

/// `Fetcher` backed by the shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    method: Method,
    random_user_agent: bool,
    // a User-Agent in the custom headers always wins over rotation
    fixed_user_agent: bool,
}

impl HttpFetcher {
    /// Wraps a client built by `initialization::init_client` for `config`.
    pub fn new(client: reqwest::Client, config: &RequestConfig) -> Self {
        HttpFetcher {
            client,
            method: config.method.clone(),
            random_user_agent: config.random_user_agent,
            fixed_user_agent: config.headers.contains_key(USER_AGENT),
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<FetchedResponse, FetchError> {
        let parsed =
            reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        let mut request = self.client.request(self.method.clone(), parsed);
        if !self.fixed_user_agent {
            request = request.header(USER_AGENT, user_agent_for_request(self.random_user_agent));
        }

        let mut response = request.send().await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response.headers().clone();

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = MAX_RESPONSE_BODY_SIZE - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                log::debug!("Body of {final_url} truncated at {MAX_RESPONSE_BODY_SIZE} bytes");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        log::debug!("{} {} -> {} ({} bytes)", self.method, url, status, body.len());

        Ok(FetchedResponse {
            url: final_url,
            status,
            headers,
            body,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<FetchedResponse, FetchError>> {
        Box::pin(self.fetch_url(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initialization::init_client;
    use httptest::{matchers::*, responders::*, Expectation, Server};

    fn fetcher(config: RequestConfig) -> HttpFetcher {
        let client = init_client(&config).unwrap();
        HttpFetcher::new(client, &config)
    }

    #[tokio::test]
    async fn test_fetch_reads_status_headers_and_body() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/")).respond_with(
                status_code(200)
                    .insert_header("Server", "nginx")
                    .body("<title>Hi</title>"),
            ),
        );

        let resp = fetcher(RequestConfig::default())
            .fetch(&server.url("/").to_string())
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.headers.get("server").unwrap(), "nginx");
        assert_eq!(resp.body_text(), "<title>Hi</title>");
        assert!(resp.url.ends_with('/'));
    }

    #[tokio::test]
    async fn test_error_status_is_still_a_response() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/missing"))
                .respond_with(status_code(404)),
        );

        let resp = fetcher(RequestConfig::default())
            .fetch(&server.url("/missing").to_string())
            .await
            .unwrap();
        assert_eq!(resp.status, 404);
    }

    #[tokio::test]
    async fn test_configured_method_is_used() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("HEAD", "/")).respond_with(status_code(204)),
        );

        let config = RequestConfig {
            method: Method::HEAD,
            ..RequestConfig::default()
        };
        let resp = fetcher(config)
            .fetch(&server.url("/").to_string())
            .await
            .unwrap();
        assert_eq!(resp.status, 204);
    }

    #[tokio::test]
    async fn test_custom_user_agent_header_wins() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/"),
                request::headers(contains(("user-agent", "edge-test/1.0"))),
            ])
            .respond_with(status_code(200)),
        );

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, "edge-test/1.0".parse().unwrap());
        let config = RequestConfig {
            headers,
            ..RequestConfig::default()
        };
        let resp = fetcher(config)
            .fetch(&server.url("/").to_string())
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
    }

    #[tokio::test]
    async fn test_custom_headers_are_sent() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/"),
                request::headers(contains(("x-scan-id", "42"))),
            ])
            .respond_with(status_code(200)),
        );

        let mut headers = HeaderMap::new();
        headers.insert("x-scan-id", "42".parse().unwrap());
        let config = RequestConfig {
            headers,
            ..RequestConfig::default()
        };
        fetcher(config)
            .fetch(&server.url("/").to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_sending() {
        let err = fetcher(RequestConfig::default())
            .fetch("not a url")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_large_body_is_capped() {
        let server = Server::run();
        let big = "a".repeat(MAX_RESPONSE_BODY_SIZE + 1024);
        server.expect(
            Expectation::matching(request::method_path("GET", "/big"))
                .respond_with(status_code(200).body(big)),
        );

        let resp = fetcher(RequestConfig::default())
            .fetch(&server.url("/big").to_string())
            .await
            .unwrap();
        assert_eq!(resp.body.len(), MAX_RESPONSE_BODY_SIZE);
    }
}
