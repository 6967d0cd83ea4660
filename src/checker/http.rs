//! Link probing
//!
//! Each link gets a HEAD request; a 405 answer is retried once with GET.
//! Links are checked in fixed-size batches: every request of a batch runs
//! concurrently, the next batch starts only after the whole batch finished,
//! and a jittered backpressure delay separates consecutive batches.

use crate::checker::classify::classify_status;
use crate::config::FetcherConfig;
use crate::crawler::{build_http_client, sleep_with_jitter};
use crate::job::{JobOptions, LinkResult};
use futures::future::join_all;
use reqwest::{Client, StatusCode};

/// Probes links and classifies them as alive, dead, or erroring
#[derive(Debug, Clone)]
pub struct LinkChecker {
    client: Client,
}

impl LinkChecker {
    /// Creates a checker with the configured identity and request timeout
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Probes one link
    ///
    /// Any response status is final except 405 on HEAD, which triggers a
    /// single GET. Transport failures become error results carrying the
    /// error text.
    pub async fn probe(&self, url: &str) -> LinkResult {
        let response = match self.client.head(url).send().await {
            Ok(response) if response.status() == StatusCode::METHOD_NOT_ALLOWED => {
                tracing::debug!("HEAD not allowed for {}, retrying with GET", url);
                self.client.get(url).send().await
            }
            other => other,
        };

        match response {
            Ok(response) => {
                let code = response.status().as_u16();
                LinkResult::from_status(url, classify_status(code), code)
            }
            Err(e) => {
                tracing::debug!("Probe of {} failed: {}", url, e);
                LinkResult::from_error(url, e.to_string())
            }
        }
    }

    /// Checks every URL and returns results in input order
    ///
    /// Batches hold `link_check_concurrency` URLs (at least one). After each
    /// batch except the last, sleeps `link_batch_delay_ms` plus up to
    /// `link_batch_jitter_ms`.
    pub async fn check_links(&self, urls: &[String], options: &JobOptions) -> Vec<LinkResult> {
        let batch_size = options.link_check_concurrency.max(1);
        let batch_count = urls.len().div_ceil(batch_size);
        let mut results = Vec::with_capacity(urls.len());

        for (index, batch) in urls.chunks(batch_size).enumerate() {
            let batch_results = join_all(batch.iter().map(|url| self.probe(url))).await;
            results.extend(batch_results);

            tracing::debug!(
                "Checked batch {}/{} ({} of {} links)",
                index + 1,
                batch_count,
                results.len(),
                urls.len()
            );

            if index + 1 < batch_count {
                sleep_with_jitter(options.link_batch_delay_ms, options.link_batch_jitter_ms).await;
            }
        }

        results
    }
}
