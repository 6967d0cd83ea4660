//! robots.txt and sitemap XML extraction
//!
//! Only `Sitemap:` directives are read from robots.txt; allow/disallow
//! rules are ignored. Sitemap XML is read with a streaming parser, and
//! namespace prefixes on element names are ignored.

use quick_xml::events::Event;
use quick_xml::Reader;

/// Locations extracted from one sitemap document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapDocument {
    /// `<sitemap><loc>` entries (non-empty only for sitemap indexes)
    pub child_sitemaps: Vec<String>,

    /// `<url><loc>` entries (always empty for sitemap indexes)
    pub urls: Vec<String>,
}

impl SitemapDocument {
    /// Returns true if this document lists other sitemaps
    pub fn is_index(&self) -> bool {
        !self.child_sitemaps.is_empty()
    }
}

/// Extracts every `Sitemap: <url>` directive from robots.txt, in order
///
/// The directive name is matched case-insensitively; trailing `#` comments
/// are not part of the URL.
///
/// # Example
///
/// ```
/// use link_sonar::sitemap::extract_sitemap_urls_from_robots_txt;
///
/// let robots = "User-agent: *\nDisallow: /private\nsitemap: https://example.com/a.xml\n";
/// assert_eq!(
///     extract_sitemap_urls_from_robots_txt(robots),
///     vec!["https://example.com/a.xml"]
/// );
/// ```
pub fn extract_sitemap_urls_from_robots_txt(robots_txt: &str) -> Vec<String> {
    robots_txt
        .lines()
        .filter_map(|line| {
            let (key, value) = line.trim().split_once(':')?;
            if !key.trim().eq_ignore_ascii_case("sitemap") {
                return None;
            }

            let value = value.split('#').next().unwrap_or("").trim();
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        })
        .collect()
}

/// Which parent element an open `<loc>` belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocParent {
    Sitemap,
    Url,
}

/// Extracts `<loc>` entries from a sitemap or sitemap index
///
/// If any `<sitemap><loc>` entry exists the document is an index: those
/// locations are returned as `child_sitemaps` and `urls` is empty.
/// Otherwise every `<url><loc>` entry is returned as `urls`. Malformed XML
/// yields whatever was read before the error.
///
/// # Example
///
/// ```
/// use link_sonar::sitemap::extract_sitemap_urls_from_xml;
///
/// let xml = r#"<urlset><url><loc>https://example.com/a</loc></url></urlset>"#;
/// let doc = extract_sitemap_urls_from_xml(xml);
/// assert!(doc.child_sitemaps.is_empty());
/// assert_eq!(doc.urls, vec!["https://example.com/a"]);
/// ```
pub fn extract_sitemap_urls_from_xml(xml: &str) -> SitemapDocument {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut child_sitemaps = Vec::new();
    let mut urls = Vec::new();

    // Open `<sitemap>`/`<url>` and the element depth it was opened at.
    // Only a `<loc>` one level below it counts, so nested extension
    // entries such as `<image:image><image:loc>` are ignored.
    let mut parent: Option<(LocParent, usize)> = None;
    let mut depth = 0usize;
    let mut in_loc = false;
    let mut loc_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                match e.local_name().as_ref() {
                    b"sitemap" => parent = Some((LocParent::Sitemap, depth)),
                    b"url" => parent = Some((LocParent::Url, depth)),
                    b"loc" if matches!(parent, Some((_, d)) if d + 1 == depth) => {
                        in_loc = true;
                        loc_text.clear();
                    }
                    _ => {}
                }
                depth += 1;
            }
            Ok(Event::Text(t)) if in_loc => match t.unescape() {
                Ok(text) => loc_text.push_str(&text),
                Err(_) => loc_text.push_str(&String::from_utf8_lossy(&t)),
            },
            Ok(Event::CData(c)) if in_loc => {
                loc_text.push_str(&String::from_utf8_lossy(&c));
            }
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);
                match e.local_name().as_ref() {
                    b"loc" if in_loc => {
                        in_loc = false;
                        let loc = loc_text.trim();
                        if !loc.is_empty() {
                            match parent {
                                Some((LocParent::Sitemap, _)) => {
                                    child_sitemaps.push(loc.to_string())
                                }
                                Some((LocParent::Url, _)) => urls.push(loc.to_string()),
                                None => {}
                            }
                        }
                    }
                    b"sitemap" | b"url" if matches!(parent, Some((_, d)) if d == depth) => {
                        parent = None
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!(
                    "Stopped reading sitemap XML at position {}: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
            _ => {}
        }
    }

    if child_sitemaps.is_empty() {
        SitemapDocument {
            child_sitemaps,
            urls,
        }
    } else {
        SitemapDocument {
            child_sitemaps,
            urls: Vec::new(),
        }
    }
}
