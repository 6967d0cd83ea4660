//! Crawler module for page fetching and link harvesting
//!
//! This module contains the crawling side of the pipeline, including:
//! - HTTP fetching with a fixed identity for discovery documents
//! - Page rendering (plain HTTP, or headless Chromium with `browser`)
//! - HTML link extraction
//! - Request pacing with jittered delays
//! - Bounded, sequential crawling of internal pages

#[cfg(feature = "browser")]
mod browser;
mod fetcher;
mod pacing;
mod page_crawler;
mod parser;
mod renderer;

#[cfg(feature = "browser")]
pub use browser::ChromeRenderer;
pub use fetcher::{build_http_client, HttpFetcher};
pub use pacing::{jitter, jittered_delay, sleep_with_jitter, POST_LOAD_JITTER_MS, POST_LOAD_PAUSE_MS};
pub use page_crawler::{select_internal_pages_to_crawl, CrawlOutcome, PageCrawler};
pub use parser::{extract_page, ExtractedPage};
pub use renderer::{HttpRenderer, PageRenderer, RenderSession, RenderedPage};
