//! Job, result, and status definitions
//!
//! A job moves `Pending -> Processing -> Completed | Failed` and never
//! changes again once it reaches a terminal state.

use crate::job::options::{JobOptions, PartialJobOptions};
use crate::{Result, SonarError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle status of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Created, not yet picked up
    Pending,

    /// Discovery, crawling or checking in progress
    Processing,

    /// Finished with a result
    Completed,

    /// Aborted with an error message
    Failed,
}

impl JobStatus {
    /// Returns true if no further transition is allowed
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if `next` is a legal successor of this status
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }

    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parses a status from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// Health classification of a single link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Alive,
    Dead,
    Error,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Alive => "alive",
            Self::Dead => "dead",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// How a job's link set was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMethod {
    /// At least one sitemap resolved to page URLs
    Sitemap,

    /// No usable sitemap; links came from crawling pages only
    Scrape,
}

impl fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sitemap => f.write_str("sitemap"),
            Self::Scrape => f.write_str("scrape"),
        }
    }
}

/// Outcome of probing one link
///
/// `status_code` is present for alive and dead links; `error` only for
/// links whose probe failed outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResult {
    pub url: String,
    pub status: LinkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LinkResult {
    /// Builds a result from a received HTTP status
    pub fn from_status(url: impl Into<String>, status: LinkStatus, status_code: u16) -> Self {
        Self {
            url: url.into(),
            status,
            status_code: Some(status_code),
            error: None,
        }
    }

    /// Builds a result for a probe that never received a response
    pub fn from_error(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: LinkStatus::Error,
            status_code: None,
            error: Some(error.into()),
        }
    }
}

/// Aggregated result of a completed job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub title: Option<String>,
    pub discovery_method: DiscoveryMethod,
    pub pages_crawled: usize,
    pub crawled_pages: Vec<String>,
    pub links_checked: usize,
    pub alive: usize,
    pub dead: usize,
    pub errors: usize,
    pub links: Vec<LinkResult>,
}

impl JobResult {
    /// Builds a result and derives every tally from `links`
    ///
    /// `alive + dead + errors == links_checked == links.len()` holds for
    /// every value built this way.
    pub fn from_links(
        title: Option<String>,
        discovery_method: DiscoveryMethod,
        crawled_pages: Vec<String>,
        links: Vec<LinkResult>,
    ) -> Self {
        let count = |status: LinkStatus| links.iter().filter(|l| l.status == status).count();
        let alive = count(LinkStatus::Alive);
        let dead = count(LinkStatus::Dead);
        let errors = count(LinkStatus::Error);

        Self {
            title,
            discovery_method,
            pages_crawled: crawled_pages.len(),
            crawled_pages,
            links_checked: links.len(),
            alive,
            dead,
            errors,
            links,
        }
    }
}

/// A job submission as received from the outside
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRequest {
    pub url: String,
    #[serde(default)]
    pub options: Option<PartialJobOptions>,
}

impl JobRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            options: None,
        }
    }

    pub fn with_options(mut self, options: PartialJobOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// A link-checking job and its lifecycle state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub url: String,
    pub options: JobOptions,
    pub status: JobStatus,
    pub result: Option<JobResult>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Creates a new pending job
    pub fn new(url: impl Into<String>, options: JobOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            options,
            status: JobStatus::Pending,
            result: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Moves the job into processing
    pub fn start(&mut self) -> Result<()> {
        self.transition(JobStatus::Processing)
    }

    /// Records a successful result and completes the job
    pub fn complete(&mut self, result: JobResult) -> Result<()> {
        self.transition(JobStatus::Completed)?;
        self.result = Some(result);
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Records an error and fails the job
    pub fn fail(&mut self, error: impl Into<String>) -> Result<()> {
        self.transition(JobStatus::Failed)?;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, to: JobStatus) -> Result<()> {
        if !self.status.can_transition_to(to) {
            return Err(SonarError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
