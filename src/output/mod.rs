//! Output module for job summaries and reports
//!
//! This module handles:
//! - Printing job summaries to the terminal
//! - Generating markdown reports
//! - Exporting jobs as JSON

mod json;
mod markdown;
pub mod stats;

pub use json::write_json_report;
pub use markdown::{format_markdown_report, write_markdown_report};
pub use stats::{print_job_summary, JobStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
