//! Sitemap discovery
//!
//! Reads `Sitemap:` directives from robots.txt, probes the well-known
//! sitemap paths, and flattens sitemap-index trees into page URLs.

mod parser;
mod resolver;

pub use parser::{extract_sitemap_urls_from_robots_txt, extract_sitemap_urls_from_xml, SitemapDocument};
pub use resolver::{SitemapResolver, WELL_KNOWN_SITEMAP_PATHS};
