//! Job options and their normalization
//!
//! Submissions carry a partial options object; it is merged once over the
//! defaults at job-creation time so every downstream stage sees a complete
//! [`JobOptions`].

use serde::{Deserialize, Serialize};

/// Fully normalized per-job options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOptions {
    /// Whether to visit internal pages beyond the root
    pub follow_internal_links: bool,

    /// Maximum number of internal pages visited after the root
    pub max_internal_pages: usize,

    /// Maximum number of discovered links probed
    pub max_links_to_check: usize,

    /// Number of links probed concurrently per batch
    pub link_check_concurrency: usize,

    /// Base pause between link-check batches (milliseconds)
    pub link_batch_delay_ms: u64,

    /// Upper bound of random extra pause between batches (milliseconds)
    pub link_batch_jitter_ms: u64,

    /// Base pause before each internal-page navigation (milliseconds)
    pub navigation_delay_ms: u64,

    /// Upper bound of random extra pause between navigations (milliseconds)
    pub navigation_jitter_ms: u64,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            follow_internal_links: true,
            max_internal_pages: 10,
            max_links_to_check: 500,
            link_check_concurrency: 3,
            link_batch_delay_ms: 600,
            link_batch_jitter_ms: 400,
            navigation_delay_ms: 800,
            navigation_jitter_ms: 500,
        }
    }
}

/// Partially specified options as supplied by a caller or config file
///
/// Numeric fields are signed so that out-of-range submissions can be
/// clamped instead of rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PartialJobOptions {
    #[serde(alias = "followInternalLinks")]
    pub follow_internal_links: Option<bool>,
    #[serde(alias = "maxInternalPages")]
    pub max_internal_pages: Option<i64>,
    #[serde(alias = "maxLinksToCheck")]
    pub max_links_to_check: Option<i64>,
    #[serde(alias = "linkCheckConcurrency")]
    pub link_check_concurrency: Option<i64>,
    #[serde(alias = "linkBatchDelayMs")]
    pub link_batch_delay_ms: Option<i64>,
    #[serde(alias = "linkBatchJitterMs")]
    pub link_batch_jitter_ms: Option<i64>,
    #[serde(alias = "navigationDelayMs")]
    pub navigation_delay_ms: Option<i64>,
    #[serde(alias = "navigationJitterMs")]
    pub navigation_jitter_ms: Option<i64>,
}

impl From<&JobOptions> for PartialJobOptions {
    fn from(options: &JobOptions) -> Self {
        Self {
            follow_internal_links: Some(options.follow_internal_links),
            max_internal_pages: Some(saturating_i64(options.max_internal_pages as u64)),
            max_links_to_check: Some(saturating_i64(options.max_links_to_check as u64)),
            link_check_concurrency: Some(saturating_i64(options.link_check_concurrency as u64)),
            link_batch_delay_ms: Some(saturating_i64(options.link_batch_delay_ms)),
            link_batch_jitter_ms: Some(saturating_i64(options.link_batch_jitter_ms)),
            navigation_delay_ms: Some(saturating_i64(options.navigation_delay_ms)),
            navigation_jitter_ms: Some(saturating_i64(options.navigation_jitter_ms)),
        }
    }
}

impl From<JobOptions> for PartialJobOptions {
    fn from(options: JobOptions) -> Self {
        Self::from(&options)
    }
}

/// Merges a partial options object over the built-in defaults
///
/// Pure and idempotent: normalizing an already-normalized set of options
/// yields the same options.
///
/// # Example
///
/// ```
/// use link_sonar::job::{normalize_options, JobOptions, PartialJobOptions};
///
/// let partial = PartialJobOptions {
///     max_internal_pages: Some(2),
///     ..Default::default()
/// };
/// let options = normalize_options(&partial);
/// assert_eq!(options.max_internal_pages, 2);
/// assert_eq!(options.max_links_to_check, JobOptions::default().max_links_to_check);
/// ```
pub fn normalize_options(partial: &PartialJobOptions) -> JobOptions {
    normalize_options_with(&JobOptions::default(), partial)
}

/// Merges a partial options object over caller-supplied defaults
///
/// Negative values clamp to zero.
pub fn normalize_options_with(defaults: &JobOptions, partial: &PartialJobOptions) -> JobOptions {
    JobOptions {
        follow_internal_links: partial
            .follow_internal_links
            .unwrap_or(defaults.follow_internal_links),
        max_internal_pages: partial
            .max_internal_pages
            .map_or(defaults.max_internal_pages, clamp_usize),
        max_links_to_check: partial
            .max_links_to_check
            .map_or(defaults.max_links_to_check, clamp_usize),
        link_check_concurrency: partial
            .link_check_concurrency
            .map_or(defaults.link_check_concurrency, clamp_usize),
        link_batch_delay_ms: partial
            .link_batch_delay_ms
            .map_or(defaults.link_batch_delay_ms, clamp_u64),
        link_batch_jitter_ms: partial
            .link_batch_jitter_ms
            .map_or(defaults.link_batch_jitter_ms, clamp_u64),
        navigation_delay_ms: partial
            .navigation_delay_ms
            .map_or(defaults.navigation_delay_ms, clamp_u64),
        navigation_jitter_ms: partial
            .navigation_jitter_ms
            .map_or(defaults.navigation_jitter_ms, clamp_u64),
    }
}

fn clamp_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn clamp_usize(value: i64) -> usize {
    usize::try_from(value).unwrap_or(if value < 0 { 0 } else { usize::MAX })
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
