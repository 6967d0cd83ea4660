/// Path extensions that never lead to crawlable HTML pages
///
/// Documents, archives, media, fonts, stylesheets and scripts. Compared
/// case-insensitively against the last path segment.
pub const NON_CONTENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "csv", "zip", "rar", "7z", "tar", "gz",
    "tgz", "bz2", "dmg", "exe", "iso", "jpg", "jpeg", "png", "gif", "svg", "webp", "ico", "mp3",
    "mp4", "mov", "avi", "webm", "wav", "woff", "woff2", "ttf", "otf", "eot", "css", "js", "json",
    "xml",
];

/// Href prefixes that never resolve to a navigable page
const SKIPPED_HREF_PREFIXES: &[&str] = &["mailto:", "tel:", "javascript:"];

/// Checks whether a URL path ends in a non-content extension
///
/// # Examples
///
/// ```
/// use link_sonar::url::has_non_content_extension;
///
/// assert!(has_non_content_extension("/files/report.PDF"));
/// assert!(has_non_content_extension("/assets/app.min.js"));
/// assert!(!has_non_content_extension("/blog/post"));
/// assert!(!has_non_content_extension("/v1.2/"));
/// ```
pub fn has_non_content_extension(path: &str) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or("");

    match last_segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => NON_CONTENT_EXTENSIONS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(ext)),
        _ => false,
    }
}

/// Checks whether a raw href uses a scheme that is never crawled
/// (`mailto:`, `tel:`, `javascript:`)
pub fn is_skipped_href(href: &str) -> bool {
    let trimmed = href.trim_start();
    SKIPPED_HREF_PREFIXES.iter().any(|prefix| {
        trimmed
            .get(..prefix.len())
            .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
    })
}
