//! URL handling module for Link-Sonar
//!
//! This module provides origin and host comparison, fragment and tracking
//! parameter stripping, and the filters that decide which links are worth
//! visiting as internal pages.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{origin_of, same_host};
pub use filter::{has_non_content_extension, is_skipped_href, NON_CONTENT_EXTENSIONS};
pub use normalize::{is_http_scheme, parse_http_url, strip_fragment, strip_tracking_params};
