//! In-memory sink for exercising the loader without a database.

use crate::error::LoaderError;
use crate::sink::{SinkSession, UserSink};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use user_core::UserRecord;

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<UserRecord>,
    flushes: HashMap<usize, Vec<usize>>,
    open_sessions: usize,
    sessions_opened: usize,
    fail_after: HashMap<usize, usize>,
    refuse: Vec<usize>,
}

/// Sink that keeps every inserted row in memory.
///
/// Records the size of each flush per worker and how many sessions are open,
/// and can be told to fail a given worker after a number of flushes.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail worker `worker_id` on the flush after its first `flushes` succeed.
    pub fn fail_worker_after(self, worker_id: usize, flushes: usize) -> Self {
        self.lock().fail_after.insert(worker_id, flushes);
        self
    }

    /// Refuse to open a session for worker `worker_id`.
    pub fn refuse_worker(self, worker_id: usize) -> Self {
        self.lock().refuse.push(worker_id);
        self
    }

    /// All rows inserted so far, in arrival order.
    pub fn rows(&self) -> Vec<UserRecord> {
        self.lock().rows.clone()
    }

    /// Number of rows inserted so far.
    pub fn row_count(&self) -> usize {
        self.lock().rows.len()
    }

    /// Sizes of the flushes executed by `worker_id`, in order.
    pub fn flushes(&self, worker_id: usize) -> Vec<usize> {
        self.lock()
            .flushes
            .get(&worker_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Sessions currently open.
    pub fn open_sessions(&self) -> usize {
        self.lock().open_sessions
    }

    /// Sessions opened over the sink's lifetime.
    pub fn sessions_opened(&self) -> usize {
        self.lock().sessions_opened
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned lock only means another test thread panicked mid-insert.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UserSink for MemorySink {
    async fn open_session(&self, worker_id: usize) -> Result<Box<dyn SinkSession>, LoaderError> {
        let mut state = self.lock();
        if state.refuse.contains(&worker_id) {
            return Err(LoaderError::Sink(format!(
                "connection refused for worker {worker_id}"
            )));
        }
        state.open_sessions += 1;
        state.sessions_opened += 1;
        Ok(Box::new(MemorySession {
            sink: self.clone(),
            worker_id,
        }))
    }
}

struct MemorySession {
    sink: MemorySink,
    worker_id: usize,
}

#[async_trait]
impl SinkSession for MemorySession {
    async fn insert_batch(&mut self, rows: &[UserRecord]) -> Result<u64, LoaderError> {
        for row in rows {
            row.validate()?;
        }

        let mut state = self.sink.lock();
        let done = state.flushes.get(&self.worker_id).map_or(0, Vec::len);
        if let Some(limit) = state.fail_after.get(&self.worker_id) {
            if done >= *limit {
                return Err(LoaderError::Sink(format!(
                    "write failed for worker {} after {} flushes",
                    self.worker_id, done
                )));
            }
        }

        state.rows.extend_from_slice(rows);
        state
            .flushes
            .entry(self.worker_id)
            .or_default()
            .push(rows.len());
        Ok(rows.len() as u64)
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        let mut state = self.sink.lock();
        state.open_sessions = state.open_sessions.saturating_sub(1);
    }
}
