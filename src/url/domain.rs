use url::Url;

/// Returns the serialized origin of a URL (`scheme://host[:port]`)
///
/// Default ports are omitted, so `https://example.com:443/a` and
/// `https://example.com/b` share the origin `https://example.com`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use link_sonar::url::origin_of;
///
/// let url = Url::parse("https://Example.com/path?q=1").unwrap();
/// assert_eq!(origin_of(&url), "https://example.com");
///
/// let url = Url::parse("http://localhost:8080/").unwrap();
/// assert_eq!(origin_of(&url), "http://localhost:8080");
/// ```
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Returns true when both URLs share host and explicit port, regardless of scheme
///
/// Default ports are not explicit, so `http://example.com` and
/// `https://example.com` count as the same host. This is the "internal page"
/// test used when deciding which pages to visit.
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(ha), Some(hb)) => ha.eq_ignore_ascii_case(hb) && a.port() == b.port(),
        _ => false,
    }
}
