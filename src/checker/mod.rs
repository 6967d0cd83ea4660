//! Link health checking
//!
//! - Status classification
//! - HEAD-first probing with GET fallback on 405
//! - Batched, rate-limited checking of link sets

mod classify;
mod http;

pub use classify::classify_status;
pub use http::LinkChecker;
