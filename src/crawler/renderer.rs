//! Page-rendering capability
//!
//! The crawler never talks to the network directly when visiting pages; it
//! opens a [`RenderSession`] from a [`PageRenderer`], navigates it page by
//! page, and closes it when done. The default [`HttpRenderer`] performs a
//! plain GET; with the `browser` feature a headless Chromium renderer is
//! available as well.

use crate::config::FetcherConfig;
use crate::crawler::fetcher::build_client_with_timeout;
use crate::{Result, SonarError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Markup of a page after navigation
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// URL after redirects
    pub final_url: Url,

    /// Serialized document
    pub html: String,
}

/// A source of rendering sessions
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Opens a fresh session (one per crawl)
    async fn open_session(&self) -> Result<Box<dyn RenderSession>>;
}

/// A single browsing context, navigated one page at a time
#[async_trait]
pub trait RenderSession: Send {
    /// Navigates to `url` and returns the rendered markup
    async fn navigate(&mut self, url: &Url) -> Result<RenderedPage>;

    /// Releases every resource held by the session
    async fn close(self: Box<Self>);
}

/// Renderer that fetches pages over plain HTTP without executing scripts
///
/// Any HTTP response counts as a successful navigation, as it would in a
/// browser; only transport failures are errors.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    /// Creates a renderer using the navigation timeout from `config`
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = build_client_with_timeout(
            config,
            Duration::from_millis(config.navigation_timeout_ms),
        )?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn open_session(&self) -> Result<Box<dyn RenderSession>> {
        Ok(Box::new(HttpSession {
            client: self.client.clone(),
        }))
    }
}

struct HttpSession {
    client: Client,
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn navigate(&mut self, url: &Url) -> Result<RenderedPage> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| SonarError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let final_url = response.url().clone();
        let html = response.text().await.map_err(|e| SonarError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(RenderedPage { final_url, html })
    }

    async fn close(self: Box<Self>) {}
}
