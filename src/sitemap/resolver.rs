//! Sitemap discovery for a site origin
//!
//! Candidates come from robots.txt `Sitemap:` directives plus the two
//! well-known paths. Sitemap indexes are expanded depth-first; every
//! document is fetched at most once per resolution, nesting is bounded by
//! `max_depth` and the total number of fetched documents by `max_sitemaps`.

use crate::config::SitemapConfig;
use crate::crawler::HttpFetcher;
use crate::sitemap::parser::{extract_sitemap_urls_from_robots_txt, extract_sitemap_urls_from_xml};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Paths probed on every origin in addition to robots.txt directives
pub const WELL_KNOWN_SITEMAP_PATHS: &[&str] = &["/sitemap.xml", "/sitemap_index.xml"];

/// Resolves robots.txt and sitemap trees into a flat set of page URLs
pub struct SitemapResolver {
    fetcher: Arc<HttpFetcher>,
    max_depth: usize,
    max_sitemaps: usize,
}

impl SitemapResolver {
    /// Creates a resolver sharing `fetcher` with the rest of the pipeline
    pub fn new(fetcher: Arc<HttpFetcher>, config: &SitemapConfig) -> Self {
        Self {
            fetcher,
            max_depth: config.max_depth,
            max_sitemaps: config.max_sitemaps,
        }
    }

    /// Returns every leaf URL reachable from the origin's sitemaps
    ///
    /// The result is deduplicated. An empty result means no sitemap was
    /// reachable or none listed any URL; fetch and parse failures of
    /// individual sitemaps are skipped.
    pub async fn discover_from_sitemap(&self, origin: &str) -> Vec<String> {
        let origin = origin.trim_end_matches('/');
        let candidates = self.candidate_sitemaps(origin).await;
        tracing::debug!("Sitemap candidates for {}: {:?}", origin, candidates);

        let mut visited: HashSet<String> = HashSet::new();
        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut urls = Vec::new();
        let mut fetched = 0usize;

        // Reversed so candidates are processed in the order they were found
        let mut stack: Vec<(String, usize)> = candidates.into_iter().rev().map(|c| (c, 0)).collect();

        while let Some((sitemap_url, depth)) = stack.pop() {
            if visited.contains(&sitemap_url) {
                continue;
            }

            // Not marked visited here: a shallower path may still reach it
            if depth > self.max_depth {
                tracing::debug!(
                    "Skipping sitemap {} nested deeper than {}",
                    sitemap_url,
                    self.max_depth
                );
                continue;
            }

            if fetched >= self.max_sitemaps {
                tracing::debug!(
                    "Sitemap limit of {} reached, skipping remaining documents",
                    self.max_sitemaps
                );
                break;
            }
            fetched += 1;
            visited.insert(sitemap_url.clone());

            let Some(xml) = self.fetcher.fetch_text(&sitemap_url).await else {
                tracing::debug!("Sitemap {} unavailable, skipping", sitemap_url);
                continue;
            };

            let base = match Url::parse(&sitemap_url) {
                Ok(base) => base,
                Err(e) => {
                    tracing::debug!("Invalid sitemap URL {}: {}", sitemap_url, e);
                    continue;
                }
            };

            let document = extract_sitemap_urls_from_xml(&xml);

            if document.is_index() {
                tracing::debug!(
                    "Sitemap index {} lists {} child sitemaps",
                    sitemap_url,
                    document.child_sitemaps.len()
                );
                let children: Vec<String> = document
                    .child_sitemaps
                    .iter()
                    .filter_map(|loc| resolve_loc(&base, loc))
                    .collect();
                for child in children.into_iter().rev() {
                    if !visited.contains(&child) {
                        stack.push((child, depth + 1));
                    }
                }
            } else {
                tracing::debug!("Sitemap {} lists {} URLs", sitemap_url, document.urls.len());
                for loc in &document.urls {
                    if let Some(url) = resolve_loc(&base, loc) {
                        if seen_urls.insert(url.clone()) {
                            urls.push(url);
                        }
                    }
                }
            }
        }

        tracing::info!(
            "Sitemap discovery for {} found {} URLs across {} documents",
            origin,
            urls.len(),
            fetched
        );

        urls
    }

    /// robots.txt directives in order, then the well-known paths not already listed
    async fn candidate_sitemaps(&self, origin: &str) -> Vec<String> {
        let robots_url = format!("{}/robots.txt", origin);
        let mut candidates = match self.fetcher.fetch_text(&robots_url).await {
            Some(robots_txt) => extract_sitemap_urls_from_robots_txt(&robots_txt),
            None => Vec::new(),
        };

        for path in WELL_KNOWN_SITEMAP_PATHS {
            let candidate = format!("{}{}", origin, path);
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }

        candidates
    }
}

/// Resolves a `<loc>` value against its sitemap, keeping only http(s) results
fn resolve_loc(base: &Url, loc: &str) -> Option<String> {
    let resolved = base.join(loc).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}
