//! A single loader worker.

use crate::config::LoaderConfig;
use crate::error::LoaderError;
use crate::partition::WorkerRange;
use crate::sink::{SinkSession, UserSink};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use user_core::UserRecord;
use user_generator::UserGenerator;

/// Outcome of one worker.
#[derive(Debug, Clone)]
pub struct WorkerReport {
    /// Worker id.
    pub worker_id: usize,
    /// Range of logical indices assigned to the worker.
    pub range: WorkerRange,
    /// Rows the sink confirmed.
    pub inserted: u64,
    /// Number of batches flushed.
    pub batches: u64,
    /// Time the worker ran.
    pub duration: Duration,
    /// Error that stopped the worker early, if any.
    pub error: Option<String>,
}

impl WorkerReport {
    fn new(worker_id: usize, range: WorkerRange) -> Self {
        Self {
            worker_id,
            range,
            inserted: 0,
            batches: 0,
            duration: Duration::ZERO,
            error: None,
        }
    }

    /// Report for a worker whose task died before reporting.
    pub(crate) fn lost(worker_id: usize, range: WorkerRange, reason: String) -> Self {
        Self {
            error: Some(reason),
            ..Self::new(worker_id, range)
        }
    }

    /// Whether the worker inserted its whole range.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Insert every record of `range` through one session on `sink`.
///
/// Errors stop this worker only: they are logged and recorded in the
/// returned report, and the rest of the range is left uninserted.
pub async fn run_worker(
    worker_id: usize,
    range: WorkerRange,
    sink: Arc<dyn UserSink>,
    config: LoaderConfig,
) -> WorkerReport {
    let start = Instant::now();
    let mut report = WorkerReport::new(worker_id, range);

    debug!("Worker {} starting on range {}", worker_id, range);

    if let Err(e) = insert_range(&mut report, sink.as_ref(), &config).await {
        error!("Database error in worker {}: {}", worker_id, e);
        report.error = Some(e.to_string());
    }

    report.duration = start.elapsed();
    debug!(
        "Worker {} finished: {} rows in {} batches ({:?})",
        worker_id, report.inserted, report.batches, report.duration
    );
    report
}

async fn insert_range(
    report: &mut WorkerReport,
    sink: &dyn UserSink,
    config: &LoaderConfig,
) -> Result<(), LoaderError> {
    if report.range.is_empty() {
        return Ok(());
    }

    let mut session = sink.open_session(report.worker_id).await?;
    let mut generator = UserGenerator::new(config.seed).with_start_index(report.range.start);
    let mut batch: Vec<UserRecord> = Vec::with_capacity(config.flush_size);

    for _ in report.range.indices() {
        batch.push(generator.next_user());

        if batch.len() >= config.flush_size {
            flush(session.as_mut(), &mut batch, report, config.progress_interval).await?;
        }
    }

    // Execute remaining batch
    if !batch.is_empty() {
        flush(session.as_mut(), &mut batch, report, config.progress_interval).await?;
    }

    Ok(())
}

async fn flush(
    session: &mut dyn SinkSession,
    batch: &mut Vec<UserRecord>,
    report: &mut WorkerReport,
    progress_interval: u64,
) -> Result<(), LoaderError> {
    let before = report.inserted;
    let inserted = session.insert_batch(batch).await?;
    batch.clear();

    report.inserted += inserted;
    report.batches += 1;

    if progress_interval > 0 && report.inserted / progress_interval > before / progress_interval {
        info!(
            "Worker {} inserted {} users",
            report.worker_id, report.inserted
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySink;
    use tracing_test::traced_test;

    fn config(flush_size: usize) -> LoaderConfig {
        LoaderConfig {
            total_records: 0,
            worker_count: 1,
            flush_size,
            progress_interval: 0,
            seed: 42,
        }
    }

    #[tokio::test]
    async fn test_worker_flushes_full_batches_and_remainder() {
        let sink = MemorySink::new();
        let range = WorkerRange { start: 0, end: 25 };

        let report = run_worker(3, range, Arc::new(sink.clone()), config(10)).await;

        assert!(report.is_success());
        assert_eq!(report.inserted, 25);
        assert_eq!(report.batches, 3);
        assert_eq!(sink.flushes(3), vec![10, 10, 5]);
    }

    #[tokio::test]
    async fn test_worker_exact_multiple_has_no_empty_flush() {
        let sink = MemorySink::new();
        let range = WorkerRange { start: 0, end: 20 };

        let report = run_worker(0, range, Arc::new(sink.clone()), config(10)).await;

        assert_eq!(report.batches, 2);
        assert_eq!(sink.flushes(0), vec![10, 10]);
    }

    #[traced_test]
    #[tokio::test]
    async fn test_worker_logs_progress_each_interval() {
        let sink = MemorySink::new();
        let range = WorkerRange { start: 0, end: 25 };
        let config = LoaderConfig {
            progress_interval: 10,
            ..config(4)
        };

        let report = run_worker(0, range, Arc::new(sink.clone()), config).await;

        assert_eq!(report.inserted, 25);
        assert!(logs_contain("Worker 0 inserted 12 users"));
        assert!(logs_contain("Worker 0 inserted 20 users"));
        assert!(!logs_contain("Worker 0 inserted 8 users"));
        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|line| line.contains(" users")).count() {
                2 => Ok(()),
                n => Err(format!("expected 2 progress lines, found {n}")),
            }
        });
    }

    #[traced_test]
    #[tokio::test]
    async fn test_worker_silent_without_progress_interval() {
        let sink = MemorySink::new();
        let range = WorkerRange { start: 0, end: 25 };

        let report = run_worker(0, range, Arc::new(sink), config(4)).await;

        assert_eq!(report.batches, 7);
        assert!(!logs_contain("users"));
    }

    #[tokio::test]
    async fn test_worker_releases_session() {
        let sink = MemorySink::new();
        let range = WorkerRange { start: 0, end: 5 };

        run_worker(0, range, Arc::new(sink.clone()), config(2)).await;

        assert_eq!(sink.sessions_opened(), 1);
        assert_eq!(sink.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_worker_stops_on_error_and_releases_session() {
        let sink = MemorySink::new().fail_worker_after(0, 1);
        let range = WorkerRange { start: 0, end: 30 };

        let report = run_worker(0, range, Arc::new(sink.clone()), config(10)).await;

        assert!(!report.is_success());
        assert_eq!(report.inserted, 10);
        assert_eq!(report.batches, 1);
        assert!(report.error.as_deref().unwrap().contains("after 1 flushes"));
        assert_eq!(sink.row_count(), 10);
        assert_eq!(sink.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_worker_connection_failure() {
        let sink = MemorySink::new().refuse_worker(0);
        let range = WorkerRange { start: 0, end: 5 };

        let report = run_worker(0, range, Arc::new(sink.clone()), config(2)).await;

        assert!(!report.is_success());
        assert_eq!(report.inserted, 0);
        assert_eq!(sink.row_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_range_opens_no_session() {
        let sink = MemorySink::new();
        let range = WorkerRange { start: 4, end: 4 };

        let report = run_worker(0, range, Arc::new(sink.clone()), config(2)).await;

        assert!(report.is_success());
        assert_eq!(sink.sessions_opened(), 0);
    }

    #[tokio::test]
    async fn test_worker_generates_its_own_slice() {
        let sink = MemorySink::new();
        let range = WorkerRange { start: 40, end: 43 };

        run_worker(4, range, Arc::new(sink.clone()), config(10)).await;

        let expected: Vec<_> = UserGenerator::new(42)
            .with_start_index(40)
            .users(3)
            .collect();
        assert_eq!(sink.rows(), expected);
    }
}
