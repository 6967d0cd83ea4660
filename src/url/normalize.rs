use crate::UrlError;
use url::{form_urlencoded, Url};

/// Exact-match tracking query parameters removed from internal links
const TRACKING_PARAMS: &[&str] = &["gclid", "fbclid", "msclkid"];

/// Parses a user-supplied URL and requires an http(s) scheme and a host
///
/// # Examples
///
/// ```
/// use link_sonar::url::parse_http_url;
///
/// assert!(parse_http_url("https://example.com/").is_ok());
/// assert!(parse_http_url("ftp://example.com/").is_err());
/// assert!(parse_http_url("not a url").is_err());
/// ```
pub fn parse_http_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !is_http_scheme(&url) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Returns true for `http` and `https` URLs
pub fn is_http_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Returns a copy of the URL without its fragment
///
/// `https://example.com/posts#one` and `https://example.com/posts` compare
/// equal after this step.
pub fn strip_fragment(url: &Url) -> Url {
    let mut stripped = url.clone();
    stripped.set_fragment(None);
    stripped
}

/// Removes common tracking parameters (`utm_*`, `gclid`, `fbclid`, `msclkid`)
///
/// Remaining parameters keep their original order and encoding. A query
/// left empty is dropped entirely, so no trailing `?` remains.
///
/// # Examples
///
/// ```
/// use link_sonar::url::strip_tracking_params;
/// use url::Url;
///
/// let mut url = Url::parse("https://example.com/page?id=7&utm_source=mail").unwrap();
/// strip_tracking_params(&mut url);
/// assert_eq!(url.as_str(), "https://example.com/page?id=7");
/// ```
pub fn strip_tracking_params(url: &mut Url) {
    let Some(query) = url.query() else {
        return;
    };

    let segments: Vec<&str> = query.split('&').collect();
    if !segments.iter().any(|segment| is_tracking_segment(segment)) {
        return;
    }

    let kept = segments
        .into_iter()
        .filter(|segment| !is_tracking_segment(segment))
        .collect::<Vec<_>>()
        .join("&");

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&kept));
    }
}

/// Checks the decoded key of one raw `key=value` query segment
fn is_tracking_segment(segment: &str) -> bool {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map_or(false, |(key, _)| is_tracking_param(&key))
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
