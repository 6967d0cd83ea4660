//! Headless Chromium renderer (cargo feature `browser`)
//!
//! One browser process is shared by every crawl; each crawl gets its own
//! page, which is closed on every exit path. Image, media and font loads
//! are blocked to save bandwidth; links live in the markup, so discovery
//! is unaffected.

use crate::config::FetcherConfig;
use crate::crawler::renderer::{PageRenderer, RenderSession, RenderedPage};
use crate::{Result, SonarError};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{EnableParams, SetBlockedUrLsParams};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

const VIEWPORT_WIDTH: u32 = 1366;
const VIEWPORT_HEIGHT: u32 = 768;

/// URL patterns for resources that never carry links
const BLOCKED_RESOURCE_PATTERNS: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.webp", "*.svg", "*.ico", "*.avif", "*.mp4", "*.webm",
    "*.mp3", "*.wav", "*.ogg", "*.woff", "*.woff2", "*.ttf", "*.otf", "*.eot",
];

/// Renders pages in headless Chromium
pub struct ChromeRenderer {
    browser: Browser,
    handler_task: JoinHandle<()>,
    user_agent: String,
    accept_language: String,
    navigation_timeout: Duration,
}

impl ChromeRenderer {
    /// Launches a headless browser configured with the fetcher identity
    pub async fn launch(config: &FetcherConfig) -> Result<Self> {
        let browser_config = BrowserConfig::builder()
            .window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
            .viewport(Viewport {
                width: VIEWPORT_WIDTH,
                height: VIEWPORT_HEIGHT,
                ..Viewport::default()
            })
            .arg(format!("--lang={}", primary_language(&config.accept_language)))
            .build()
            .map_err(SonarError::Browser)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| SonarError::Browser(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        tracing::info!("Launched headless browser");

        Ok(Self {
            browser,
            handler_task,
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
            navigation_timeout: Duration::from_millis(config.navigation_timeout_ms),
        })
    }

    /// Closes the browser process
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        self.handler_task.abort();
    }

    async fn prepare_page(&self, page: &Page) -> Result<()> {
        let user_agent = SetUserAgentOverrideParams::builder()
            .user_agent(self.user_agent.clone())
            .accept_language(self.accept_language.clone())
            .build()
            .map_err(SonarError::Browser)?;
        page.execute(user_agent).await.map_err(browser_error)?;

        page.execute(EnableParams::default())
            .await
            .map_err(browser_error)?;

        let patterns = BLOCKED_RESOURCE_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .collect();
        page.execute(SetBlockedUrLsParams::new(patterns))
            .await
            .map_err(browser_error)?;

        Ok(())
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn open_session(&self) -> Result<Box<dyn RenderSession>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(browser_error)?;

        if let Err(e) = self.prepare_page(&page).await {
            let _ = page.close().await;
            return Err(e);
        }

        Ok(Box::new(ChromeSession {
            page,
            navigation_timeout: self.navigation_timeout,
        }))
    }
}

struct ChromeSession {
    page: Page,
    navigation_timeout: Duration,
}

#[async_trait]
impl RenderSession for ChromeSession {
    async fn navigate(&mut self, url: &Url) -> Result<RenderedPage> {
        let navigation_error = |message: String| SonarError::Navigation {
            url: url.to_string(),
            message,
        };

        match tokio::time::timeout(self.navigation_timeout, self.page.goto(url.as_str())).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(navigation_error(e.to_string())),
            Err(_) => {
                return Err(navigation_error(format!(
                    "timed out after {}ms",
                    self.navigation_timeout.as_millis()
                )))
            }
        }

        let html = self
            .page
            .content()
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        let final_url = self
            .page
            .url()
            .await
            .ok()
            .flatten()
            .and_then(|u| Url::parse(&u).ok())
            .unwrap_or_else(|| url.clone());

        Ok(RenderedPage { final_url, html })
    }

    async fn close(self: Box<Self>) {
        if let Err(e) = self.page.close().await {
            tracing::debug!("Failed to close browser page: {}", e);
        }
    }
}

fn browser_error(e: chromiumoxide::error::CdpError) -> SonarError {
    SonarError::Browser(e.to_string())
}

/// First language tag of an Accept-Language value (`en-US,en;q=0.9` -> `en-US`)
fn primary_language(accept_language: &str) -> &str {
    accept_language
        .split([',', ';'])
        .next()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .unwrap_or("en-US")
}
