use crate::job::PartialJobOptions;
use serde::Deserialize;

/// Default browser-like identity used for every outbound request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Default Accept header sent with fetches
pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Default Accept-Language header sent with fetches
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Main configuration structure for Link-Sonar
///
/// Every section is optional in the TOML file; missing sections fall back
/// to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,

    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// Overrides applied on top of the built-in job option defaults
    #[serde(default)]
    pub defaults: PartialJobOptions,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Request identity and timeouts shared by discovery, crawling, and checking
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// User-Agent header (and browser user agent when rendering)
    pub user_agent: String,

    /// Accept header for text fetches
    pub accept: String,

    /// Accept-Language header (and browser locale)
    pub accept_language: String,

    /// Timeout for sitemap fetches and link probes (milliseconds)
    pub request_timeout_ms: u64,

    /// Timeout for a single page navigation (milliseconds)
    pub navigation_timeout_ms: u64,

    /// Maximum redirect hops followed per request
    pub max_redirects: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            request_timeout_ms: 10_000,
            navigation_timeout_ms: 15_000,
            max_redirects: 10,
        }
    }
}

/// Limits for sitemap-index traversal
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SitemapConfig {
    /// Maximum sitemap-index nesting depth (candidates from robots.txt are depth 0)
    pub max_depth: usize,

    /// Maximum number of sitemap documents fetched for a single job
    pub max_sitemaps: usize,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            max_sitemaps: 200,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the SQLite job database (in-memory store when absent)
    pub database_path: Option<String>,

    /// Path to the markdown report written after each job
    pub report_path: Option<String>,
}
