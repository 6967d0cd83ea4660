//! HTTP fetcher implementation
//!
//! This module handles the plain-text requests made during discovery:
//! - Building HTTP clients with the fixed request identity
//! - GET requests for robots.txt and sitemap documents
//! - Swallowing every failure into "nothing found here"

use crate::config::FetcherConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Builds an HTTP client with the configured identity and timeouts
///
/// The client follows redirects up to `max_redirects` hops and applies
/// `request_timeout_ms` to every request as a whole.
///
/// # Example
///
/// ```no_run
/// use link_sonar::config::FetcherConfig;
/// use link_sonar::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    build_client_with_timeout(config, Duration::from_millis(config.request_timeout_ms))
}

/// Builds a client like [`build_http_client`] but with an explicit timeout
pub(crate) fn build_client_with_timeout(
    config: &FetcherConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(default_headers(config))
        .timeout(timeout)
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

fn default_headers(config: &FetcherConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&config.accept) {
        headers.insert(ACCEPT, value);
    }
    if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    }
    headers
}

/// Fetches text documents for discovery
///
/// Every failure (non-2xx status, timeout, DNS, TLS, connection, body
/// decoding) collapses into `None`; callers treat that as "nothing here".
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from the fetcher configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// The underlying client, shared with the link checker
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// GETs `url` and returns the body for 2xx responses
    pub async fn fetch_text(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Fetch of {} failed: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Fetch of {} returned HTTP {}", url, status.as_u16());
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!("Reading body of {} failed: {}", url, e);
                None
            }
        }
    }
}
