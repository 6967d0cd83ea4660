//! Storage traits and error types
//!
//! This module defines the trait interface for job store backends and
//! associated error types.

use crate::job::{Job, JobResult};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Job not found: {0}")]
    JobNotFound(Uuid),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence surface for jobs
///
/// The lifecycle callbacks are last-write-wins updates keyed by job id;
/// calling one twice with the same arguments leaves the store unchanged.
/// Implementations must be safe to share between job tasks.
pub trait JobStore: Send + Sync {
    /// Persists a newly created job
    fn insert(&self, job: &Job) -> StorageResult<()>;

    /// Loads a job snapshot, `None` if the id is unknown
    fn get(&self, id: Uuid) -> StorageResult<Option<Job>>;

    /// The job entered processing
    fn on_processing(&self, id: Uuid) -> StorageResult<()>;

    /// The job completed with `result`
    fn on_completed(&self, id: Uuid, result: &JobResult) -> StorageResult<()>;

    /// The job failed with `error`
    fn on_failed(&self, id: Uuid, error: &str) -> StorageResult<()>;
}
