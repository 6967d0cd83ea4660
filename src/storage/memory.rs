//! In-memory job store

use crate::job::{Job, JobResult, JobStatus};
use crate::storage::traits::{JobStore, StorageError, StorageResult};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Job store backed by a mutex-protected map
///
/// Used by tests and one-shot CLI runs without a database.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: Mutex<HashMap<Uuid, Job>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs
    pub fn len(&self) -> usize {
        self.lock().map(|jobs| jobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, HashMap<Uuid, Job>>> {
        self.jobs.lock().map_err(|_| StorageError::Poisoned)
    }

    fn update(&self, id: Uuid, apply: impl FnOnce(&mut Job)) -> StorageResult<()> {
        let mut jobs = self.lock()?;
        let job = jobs.get_mut(&id).ok_or(StorageError::JobNotFound(id))?;
        apply(job);
        Ok(())
    }
}

impl JobStore for MemoryJobStore {
    fn insert(&self, job: &Job) -> StorageResult<()> {
        self.lock()?.insert(job.id, job.clone());
        Ok(())
    }

    fn get(&self, id: Uuid) -> StorageResult<Option<Job>> {
        Ok(self.lock()?.get(&id).cloned())
    }

    fn on_processing(&self, id: Uuid) -> StorageResult<()> {
        self.update(id, |job| job.status = JobStatus::Processing)
    }

    fn on_completed(&self, id: Uuid, result: &JobResult) -> StorageResult<()> {
        self.update(id, |job| {
            job.status = JobStatus::Completed;
            job.result = Some(result.clone());
            job.error = None;
            job.completed_at.get_or_insert_with(Utc::now);
        })
    }

    fn on_failed(&self, id: Uuid, error: &str) -> StorageResult<()> {
        self.update(id, |job| {
            job.status = JobStatus::Failed;
            job.error = Some(error.to_string());
            job.result = None;
            job.completed_at.get_or_insert_with(Utc::now);
        })
    }
}
