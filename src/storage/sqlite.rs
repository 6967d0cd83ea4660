//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the JobStore
//! trait. Options and results are stored as JSON columns.

use crate::job::{Job, JobResult, JobStatus};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{JobStore, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// SQLite job store backend
pub struct SqliteJobStore {
    conn: Mutex<Connection>,
}

impl SqliteJobStore {
    /// Opens or creates the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    fn expect_updated(id: Uuid, changed: usize) -> StorageResult<()> {
        if changed == 0 {
            Err(StorageError::JobNotFound(id))
        } else {
            Ok(())
        }
    }
}

/// Raw column values of one jobs row
struct JobRow {
    id: String,
    url: String,
    options: String,
    status: String,
    result: Option<String>,
    error: Option<String>,
    created_at: String,
    completed_at: Option<String>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<JobRow> {
    Ok(JobRow {
        id: row.get(0)?,
        url: row.get(1)?,
        options: row.get(2)?,
        status: row.get(3)?,
        result: row.get(4)?,
        error: row.get(5)?,
        created_at: row.get(6)?,
        completed_at: row.get(7)?,
    })
}

fn decode_job(row: JobRow) -> StorageResult<Job> {
    let id = Uuid::parse_str(&row.id)
        .map_err(|e| StorageError::Database(format!("Invalid job id {}: {}", row.id, e)))?;
    let status = JobStatus::from_db_string(&row.status)
        .ok_or_else(|| StorageError::Database(format!("Invalid job status: {}", row.status)))?;
    let result = row
        .result
        .as_deref()
        .map(|json| serde_json::from_str::<JobResult>(json))
        .transpose()?;

    Ok(Job {
        id,
        url: row.url,
        options: serde_json::from_str(&row.options)?,
        status,
        result,
        error: row.error,
        created_at: parse_timestamp(&row.created_at)?,
        completed_at: row.completed_at.as_deref().map(parse_timestamp).transpose()?,
    })
}

fn parse_timestamp(value: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Database(format!("Invalid timestamp {}: {}", value, e)))
}

impl JobStore for SqliteJobStore {
    fn insert(&self, job: &Job) -> StorageResult<()> {
        let options = serde_json::to_string(&job.options)?;
        let result = job.result.as_ref().map(serde_json::to_string).transpose()?;

        self.lock()?.execute(
            "INSERT OR REPLACE INTO jobs (id, url, options, status, result, error, created_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                job.id.to_string(),
                job.url,
                options,
                job.status.to_db_string(),
                result,
                job.error,
                job.created_at.to_rfc3339(),
                job.completed_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: Uuid) -> StorageResult<Option<Job>> {
        let row = self
            .lock()?
            .query_row(
                "SELECT id, url, options, status, result, error, created_at, completed_at
                 FROM jobs WHERE id = ?1",
                params![id.to_string()],
                read_row,
            )
            .optional()?;

        row.map(decode_job).transpose()
    }

    fn on_processing(&self, id: Uuid) -> StorageResult<()> {
        let changed = self.lock()?.execute(
            "UPDATE jobs SET status = ?1 WHERE id = ?2",
            params![JobStatus::Processing.to_db_string(), id.to_string()],
        )?;
        Self::expect_updated(id, changed)
    }

    fn on_completed(&self, id: Uuid, result: &JobResult) -> StorageResult<()> {
        let result = serde_json::to_string(result)?;
        let now = Utc::now().to_rfc3339();
        let changed = self.lock()?.execute(
            "UPDATE jobs SET status = ?1, result = ?2, error = NULL,
             completed_at = COALESCE(completed_at, ?3) WHERE id = ?4",
            params![JobStatus::Completed.to_db_string(), result, now, id.to_string()],
        )?;
        Self::expect_updated(id, changed)
    }

    fn on_failed(&self, id: Uuid, error: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self.lock()?.execute(
            "UPDATE jobs SET status = ?1, error = ?2, result = NULL,
             completed_at = COALESCE(completed_at, ?3) WHERE id = ?4",
            params![JobStatus::Failed.to_db_string(), error, now, id.to_string()],
        )?;
        Self::expect_updated(id, changed)
    }
}
