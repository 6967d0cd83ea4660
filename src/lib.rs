//! Link-Sonar: outbound link discovery and health checking
//!
//! This crate discovers the links a website points at (via robots.txt and
//! sitemaps, falling back to scraping the site itself), crawls a bounded
//! number of internal pages to harvest more of them, and probes every link
//! to classify it as alive, dead, or erroring.

pub mod checker;
pub mod config;
pub mod crawler;
pub mod job;
pub mod output;
pub mod sitemap;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Link-Sonar operations
#[derive(Debug, Error)]
pub enum SonarError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Invalid job transition: {from} -> {to}")]
    InvalidTransition {
        from: job::JobStatus,
        to: job::JobStatus,
    },

    #[error("Job task error: {0}")]
    Task(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Link-Sonar operations
pub type Result<T> = std::result::Result<T, SonarError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use checker::{classify_status, LinkChecker};
pub use config::Config;
pub use crawler::{HttpFetcher, PageCrawler};
pub use job::{
    normalize_options, Job, JobOptions, JobOrchestrator, JobRequest, JobResult, JobStatus,
    LinkResult, LinkStatus, PartialJobOptions,
};
pub use sitemap::SitemapResolver;
pub use storage::{JobStore, MemoryJobStore, SqliteJobStore};
