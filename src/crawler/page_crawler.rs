//! Page crawler
//!
//! Visits the root page and, when enabled, a bounded number of internal
//! pages one at a time, collecting every absolute link seen along the way.

use crate::crawler::pacing::{post_load_pause, sleep_with_jitter};
use crate::crawler::parser::extract_page;
use crate::crawler::renderer::{PageRenderer, RenderSession};
use crate::job::JobOptions;
use crate::url::{is_http_scheme, origin_of, same_host, strip_fragment};
use crate::Result;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Everything the crawler learned about a site
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Title of the root page
    pub title: Option<String>,

    /// Every absolute link discovered, in first-seen order
    pub links: Vec<String>,

    /// Pages that were successfully rendered, root first
    pub pages_crawled: Vec<String>,
}

/// Crawls a site through a page-rendering capability
#[derive(Clone)]
pub struct PageCrawler {
    renderer: Arc<dyn PageRenderer>,
}

impl PageCrawler {
    pub fn new(renderer: Arc<dyn PageRenderer>) -> Self {
        Self { renderer }
    }

    /// Crawls `root_url` and up to `max_internal_pages` internal pages
    ///
    /// Internal pages are chosen from the root page's internal links first,
    /// then from `extra_seed_pages` (e.g. sitemap URLs). A failed root
    /// navigation is returned as an error; failed internal navigations are
    /// skipped. The rendering session is closed on every path.
    pub async fn crawl(
        &self,
        root_url: &Url,
        options: &JobOptions,
        extra_seed_pages: &[String],
    ) -> Result<CrawlOutcome> {
        let mut session = self.renderer.open_session().await?;
        let outcome = crawl_with_session(session.as_mut(), root_url, options, extra_seed_pages).await;
        session.close().await;
        outcome
    }
}

async fn crawl_with_session(
    session: &mut dyn RenderSession,
    root_url: &Url,
    options: &JobOptions,
    extra_seed_pages: &[String],
) -> Result<CrawlOutcome> {
    let root = strip_fragment(root_url);
    let root_origin = origin_of(&root);

    let mut outcome = CrawlOutcome::default();
    let mut seen_links = HashSet::new();

    tracing::debug!("Rendering root page {}", root);
    let rendered = session.navigate(&root).await?;
    post_load_pause().await;

    let root_page = extract_page(&rendered.html, &rendered.final_url, &root_origin);
    outcome.title = root_page.title;
    outcome.pages_crawled.push(root.to_string());
    add_links(&mut outcome.links, &mut seen_links, root_page.absolute_links);

    if !options.follow_internal_links || options.max_internal_pages == 0 {
        return Ok(outcome);
    }

    let candidates: Vec<String> = root_page
        .internal_links
        .into_iter()
        .chain(extra_seed_pages.iter().cloned())
        .collect();
    let to_visit = select_internal_pages_to_crawl(&root, &candidates, options.max_internal_pages);

    tracing::debug!(
        "Visiting {} internal pages of {} ({} candidates)",
        to_visit.len(),
        root,
        candidates.len()
    );

    for page in to_visit {
        sleep_with_jitter(options.navigation_delay_ms, options.navigation_jitter_ms).await;

        let Ok(page_url) = Url::parse(&page) else {
            continue;
        };

        match session.navigate(&page_url).await {
            Ok(rendered) => {
                post_load_pause().await;
                let extracted = extract_page(&rendered.html, &rendered.final_url, &root_origin);
                add_links(&mut outcome.links, &mut seen_links, extracted.absolute_links);
                outcome.pages_crawled.push(page);
            }
            Err(e) => {
                tracing::debug!("Skipping internal page {}: {}", page, e);
            }
        }
    }

    Ok(outcome)
}

fn add_links(links: &mut Vec<String>, seen: &mut HashSet<String>, new_links: Vec<String>) {
    for link in new_links {
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }
}

/// Picks the internal pages to visit after the root
///
/// Candidates are parsed, fragment-stripped and deduplicated in first-seen
/// order. Non-http(s) URLs, URLs on another host, and the root itself are
/// dropped. At most `max_internal_pages` URLs are returned.
///
/// # Example
///
/// ```
/// use link_sonar::crawler::select_internal_pages_to_crawl;
/// use url::Url;
///
/// let root = Url::parse("https://example.com/").unwrap();
/// let candidates = vec![
///     "https://example.com/#a".to_string(),
///     "https://example.com/posts#one".to_string(),
///     "https://example.com/posts#two".to_string(),
///     "https://example.com/posts".to_string(),
/// ];
/// assert_eq!(
///     select_internal_pages_to_crawl(&root, &candidates, 10),
///     vec!["https://example.com/posts"]
/// );
/// ```
pub fn select_internal_pages_to_crawl(
    root_url: &Url,
    candidates: &[String],
    max_internal_pages: usize,
) -> Vec<String> {
    let root = strip_fragment(root_url);
    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    for candidate in candidates {
        if selected.len() >= max_internal_pages {
            break;
        }

        let Ok(parsed) = root.join(candidate.trim()) else {
            continue;
        };

        if !is_http_scheme(&parsed) || !same_host(&parsed, &root) {
            continue;
        }

        let normalized = strip_fragment(&parsed);
        if normalized == root {
            continue;
        }

        let key = normalized.to_string();
        if seen.insert(key.clone()) {
            selected.push(key);
        }
    }

    selected
}
