//! HTML link extraction
//!
//! A pure function over a rendered page's markup: it resolves every anchor
//! against the page URL and returns the page title, the absolute links
//! (any origin), and the internal links worth visiting (same origin as the
//! root, filtered).

use crate::url::{
    has_non_content_extension, is_http_scheme, is_skipped_href, origin_of, strip_fragment,
    strip_tracking_params,
};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Extracted information from a rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// The page title (from the first non-empty `<title>` tag)
    pub title: Option<String>,

    /// Every anchor target resolved to an absolute http(s) URL, fragment
    /// stripped, in document order without duplicates
    pub absolute_links: Vec<String>,

    /// Same-origin anchor targets suitable for crawling, in document order
    /// without duplicates
    pub internal_links: Vec<String>,
}

/// Extracts the title, absolute links and internal links of a page
///
/// # Link Rules
///
/// **Absolute links:** every `<a href>` resolved against `page_url`
/// (honouring `<base href>`), fragment removed, `http`/`https` only.
///
/// **Internal links:** the absolute links whose origin equals
/// `root_origin`, excluding:
/// - `mailto:`, `tel:`, `javascript:` hrefs
/// - anchors with a `download` attribute
/// - anchors with `rel="nofollow"`
/// - paths ending in a non-content extension
///
/// Tracking parameters are removed from internal links.
///
/// # Example
///
/// ```
/// use link_sonar::crawler::extract_page;
/// use url::Url;
///
/// let html = r#"<title>Home</title><a href="/about#team">About</a><a href="https://other.com/">Out</a>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let page = extract_page(html, &page_url, "https://example.com");
///
/// assert_eq!(page.title.as_deref(), Some("Home"));
/// assert_eq!(page.absolute_links, vec!["https://example.com/about", "https://other.com/"]);
/// assert_eq!(page.internal_links, vec!["https://example.com/about"]);
/// ```
pub fn extract_page(html: &str, page_url: &Url, root_origin: &str) -> ExtractedPage {
    let document = Html::parse_document(html);
    let base_url = document_base_url(&document, page_url);

    let mut page = ExtractedPage {
        title: extract_title(&document),
        ..Default::default()
    };

    let anchor_selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return page,
    };

    for anchor in document.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let Some(absolute) = resolve_href(href, &base_url) else {
            continue;
        };

        let absolute_str = absolute.to_string();
        if !page.absolute_links.contains(&absolute_str) {
            page.absolute_links.push(absolute_str);
        }

        if let Some(internal) = internal_link(&anchor, href, absolute, root_origin) {
            if !page.internal_links.contains(&internal) {
                page.internal_links.push(internal);
            }
        }
    }

    page
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .find(|s| !s.is_empty())
}

/// Resolves the URL relative links are joined against (`<base href>` wins)
fn document_base_url(document: &Html, page_url: &Url) -> Url {
    Selector::parse("base[href]")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|base| base.value().attr("href"))
                .and_then(|href| page_url.join(href.trim()).ok())
        })
        .unwrap_or_else(|| page_url.clone())
}

/// Resolves an href to an absolute http(s) URL without fragment
fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let resolved = base_url.join(href).ok()?;
    if !is_http_scheme(&resolved) {
        return None;
    }

    Some(strip_fragment(&resolved))
}

/// Applies the internal-link filters to an already-resolved anchor target
fn internal_link(
    anchor: &ElementRef<'_>,
    href: &str,
    mut absolute: Url,
    root_origin: &str,
) -> Option<String> {
    if origin_of(&absolute) != root_origin {
        return None;
    }

    if is_skipped_href(href) {
        return None;
    }

    let element = anchor.value();
    if element.attr("download").is_some() {
        return None;
    }

    let nofollow = element
        .attr("rel")
        .map(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("nofollow"))
        })
        .unwrap_or(false);
    if nofollow {
        return None;
    }

    if has_non_content_extension(absolute.path()) {
        return None;
    }

    strip_tracking_params(&mut absolute);
    Some(absolute.to_string())
}
