//! Storage module for persisting jobs
//!
//! This module defines the job-store interface the orchestrator reports
//! lifecycle transitions to, including:
//! - The `JobStore` trait and storage errors
//! - An in-memory store
//! - A SQLite store with schema management

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryJobStore;
pub use sqlite::SqliteJobStore;
pub use traits::{JobStore, StorageError, StorageResult};

use std::path::Path;
use std::sync::Arc;

/// Opens the SQLite store at `path`, or an in-memory store when `None`
pub fn open_job_store(path: Option<&Path>) -> StorageResult<Arc<dyn JobStore>> {
    match path {
        Some(path) => Ok(Arc::new(SqliteJobStore::new(path)?)),
        None => Ok(Arc::new(MemoryJobStore::new())),
    }
}
