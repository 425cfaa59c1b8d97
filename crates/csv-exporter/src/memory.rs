//! In-memory source for exercising the exporter without a database.

use crate::config::PagingMode;
use crate::error::ExporterError;
use crate::source::{PageRequest, SourceSession, UserSource};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use user_core::ExportRow;

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<ExportRow>,
    failures_remaining: u32,
    requests: Vec<PageRequest>,
    open_sessions: usize,
}

/// Source serving a fixed set of rows, ordered by id.
///
/// Can be told to fail the next N page fetches, and records every request.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySource {
    /// Create a source holding `rows`.
    pub fn new(mut rows: Vec<ExportRow>) -> Self {
        rows.sort_by_key(|r| r.id);
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                rows,
                ..Default::default()
            })),
        }
    }

    /// Fail the next `count` page fetches.
    pub fn fail_next(self, count: u32) -> Self {
        self.lock().failures_remaining = count;
        self
    }

    /// Add rows, as a concurrent loader would.
    pub fn push_rows(&self, rows: impl IntoIterator<Item = ExportRow>) {
        let mut state = self.lock();
        state.rows.extend(rows);
        state.rows.sort_by_key(|r| r.id);
    }

    /// Every page request received so far.
    pub fn requests(&self) -> Vec<PageRequest> {
        self.lock().requests.clone()
    }

    /// Sessions currently open.
    pub fn open_sessions(&self) -> usize {
        self.lock().open_sessions
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UserSource for MemorySource {
    async fn open_session(&self) -> Result<Box<dyn SourceSession>, ExporterError> {
        self.lock().open_sessions += 1;
        Ok(Box::new(MemorySession {
            source: self.clone(),
        }))
    }
}

struct MemorySession {
    source: MemorySource,
}

#[async_trait]
impl SourceSession for MemorySession {
    async fn fetch_page(&mut self, request: PageRequest) -> Result<Vec<ExportRow>, ExporterError> {
        let mut state = self.source.lock();
        state.requests.push(request);

        if state.failures_remaining > 0 {
            state.failures_remaining -= 1;
            return Err(ExporterError::Source("injected page failure".to_string()));
        }

        let after = match request.paging {
            PagingMode::Keyset => request.after_id,
            PagingMode::Fixed => None,
        };
        Ok(state
            .rows
            .iter()
            .filter(|r| after.map_or(true, |after| r.id > after))
            .take(request.limit)
            .cloned()
            .collect())
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        let mut state = self.source.lock();
        state.open_sessions = state.open_sessions.saturating_sub(1);
    }
}
