//! Job model and orchestration
//!
//! This module contains:
//! - Job options and their normalization
//! - The job lifecycle state machine and result types
//! - The orchestrator that runs discovery, crawling and checking per job

mod options;
mod orchestrator;
mod types;

pub use options::{normalize_options, normalize_options_with, JobOptions, PartialJobOptions};
pub use orchestrator::{JobOrchestrator, SubmittedJob};
pub use types::{DiscoveryMethod, Job, JobRequest, JobResult, JobStatus, LinkResult, LinkStatus};
