//! Shared fixtures for the integration tests

use link_sonar::job::{Job, JobOptions, JobResult};
use link_sonar::storage::{JobStore, MemoryJobStore, StorageResult};
use std::sync::Mutex;
use uuid::Uuid;

/// Options without politeness delays so tests run quickly
pub fn fast_options() -> JobOptions {
    JobOptions {
        link_batch_delay_ms: 0,
        link_batch_jitter_ms: 0,
        navigation_delay_ms: 0,
        navigation_jitter_ms: 0,
        ..JobOptions::default()
    }
}

/// Wraps an HTML body in a minimal document
pub fn html_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>{}</title></head><body>{}</body></html>",
        title, body
    )
}

/// Job store that records every callback it receives
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryJobStore,
    events: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: &str) {
        self.events.lock().unwrap().push(event.to_string());
    }
}

impl JobStore for RecordingStore {
    fn insert(&self, job: &Job) -> StorageResult<()> {
        self.record("insert");
        self.inner.insert(job)
    }

    fn get(&self, id: Uuid) -> StorageResult<Option<Job>> {
        self.inner.get(id)
    }

    fn on_processing(&self, id: Uuid) -> StorageResult<()> {
        self.record("processing");
        self.inner.on_processing(id)
    }

    fn on_completed(&self, id: Uuid, result: &JobResult) -> StorageResult<()> {
        self.record("completed");
        self.inner.on_completed(id, result)
    }

    fn on_failed(&self, id: Uuid, error: &str) -> StorageResult<()> {
        self.record("failed");
        self.inner.on_failed(id, error)
    }
}
