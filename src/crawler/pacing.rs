//! Request pacing
//!
//! Jittered delays used to keep request patterns from bunching up against
//! the target site:
//! - the short pause after each page load
//! - the politeness delay between internal-page navigations
//! - the backpressure delay between link-check batches

use rand::Rng;
use std::time::Duration;

/// Fixed part of the pause taken after a page has loaded (milliseconds)
pub const POST_LOAD_PAUSE_MS: u64 = 250;

/// Upper bound of the random part of the post-load pause (milliseconds)
pub const POST_LOAD_JITTER_MS: u64 = 250;

/// Returns a random number of milliseconds in `[0, max_ms]`
///
/// Zero and negative bounds always yield 0.
///
/// # Examples
///
/// ```
/// use link_sonar::crawler::jitter;
///
/// assert_eq!(jitter(0), 0);
/// assert_eq!(jitter(-10), 0);
/// assert!(jitter(50) <= 50);
/// ```
pub fn jitter(max_ms: i64) -> u64 {
    if max_ms <= 0 {
        return 0;
    }
    rand::thread_rng().gen_range(0..=max_ms as u64)
}

/// Computes `base_ms + jitter(jitter_ms)` as a duration
pub fn jittered_delay(base_ms: u64, jitter_ms: u64) -> Duration {
    let max = i64::try_from(jitter_ms).unwrap_or(i64::MAX);
    Duration::from_millis(base_ms.saturating_add(jitter(max)))
}

/// Sleeps for `base_ms + jitter(jitter_ms)`; returns immediately when both are 0
pub async fn sleep_with_jitter(base_ms: u64, jitter_ms: u64) {
    let delay = jittered_delay(base_ms, jitter_ms);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Short randomized pause taken after every page load
pub async fn post_load_pause() {
    sleep_with_jitter(POST_LOAD_PAUSE_MS, POST_LOAD_JITTER_MS).await;
}
