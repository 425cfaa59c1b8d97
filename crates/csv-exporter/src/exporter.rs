//! The polling export loop.

use crate::config::ExporterConfig;
use crate::cursor::ExportCursor;
use crate::error::ExporterError;
use crate::source::{PageRequest, UserSource};
use crate::writer::{file_len, CsvAppender};
use checkpoint::{save_checkpoint, Checkpoint, CheckpointStore};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Why an export run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The file holds `target_records` data rows.
    TargetReached,
    /// `max_passes` passes ran.
    PassLimit,
    /// A shutdown signal arrived between passes.
    Interrupted,
}

/// Result of one export pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassOutcome {
    /// Rows returned by the page query.
    pub rows_fetched: usize,
    /// Rows appended to the file.
    pub rows_written: u64,
}

/// Aggregate outcome of an export run.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Passes attempted, failed ones included.
    pub passes: u64,
    /// Passes that failed and were retried.
    pub failed_passes: u64,
    /// Rows appended during this run.
    pub rows_written: u64,
    /// Data rows in the file when the run ended.
    pub rows_exported: u64,
    /// Why the run ended.
    pub stop_reason: StopReason,
    /// Wall-clock time of the run.
    pub duration: Duration,
}

/// Grows a CSV file toward a target row count, one page per pass.
pub struct CsvExporter {
    config: ExporterConfig,
    store: Box<dyn CheckpointStore>,
    cursor: ExportCursor,
    /// Set by a failed pass; the next attempt checks the file first.
    needs_resync: bool,
}

impl CsvExporter {
    /// Validate `config` and recover the cursor from `store`.
    pub async fn open(
        config: ExporterConfig,
        store: Box<dyn CheckpointStore>,
    ) -> Result<Self, ExporterError> {
        config.validate()?;
        let cursor = ExportCursor::recover(store.as_ref(), &config.output).await?;
        Ok(Self {
            config,
            store,
            cursor,
            needs_resync: false,
        })
    }

    /// Delete the destination file and the persisted cursor.
    pub async fn reset(output: &Path, store: &dyn CheckpointStore) -> Result<(), ExporterError> {
        match std::fs::remove_file(output) {
            Ok(()) => info!("Removed {}", output.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        store.clear().await?;
        Ok(())
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    /// Current export position.
    pub fn cursor(&self) -> &ExportCursor {
        &self.cursor
    }

    /// Run passes until the target is reached, the pass limit is hit, a
    /// shutdown signal arrives or retries are exhausted.
    ///
    /// The sender side of `shutdown` must stay alive for the whole run: a
    /// closed channel counts as a shutdown signal.
    pub async fn run(
        &mut self,
        source: &dyn UserSource,
        mut shutdown: Option<broadcast::Receiver<()>>,
    ) -> Result<ExportSummary, ExporterError> {
        let start_time = Instant::now();
        let target = self.config.target_records;
        let mut passes = 0u64;
        let mut failed_passes = 0u64;
        let mut consecutive_failures = 0u32;
        let mut rows_written = 0u64;

        info!(
            "Exporting to {} ({} of {} records present, {:?} paging)",
            self.config.output.display(),
            self.cursor.rows_exported,
            target,
            self.config.paging
        );

        let stop_reason = loop {
            if self.cursor.rows_exported >= target {
                info!(
                    "CSV file has reached {} records. Stopping export.",
                    self.cursor.rows_exported
                );
                break StopReason::TargetReached;
            }
            if self.config.max_passes.is_some_and(|max| passes >= max) {
                info!("Stopping after {} passes", passes);
                break StopReason::PassLimit;
            }

            passes += 1;
            let delay = match self.attempt_pass(source).await {
                Ok(outcome) => {
                    consecutive_failures = 0;
                    rows_written += outcome.rows_written;
                    self.config.poll_interval
                }
                Err(e) => {
                    consecutive_failures += 1;
                    failed_passes += 1;
                    error!(
                        "Export pass {} failed ({}/{}): {}",
                        passes, consecutive_failures, self.config.retry.max_attempts, e
                    );
                    self.needs_resync = true;

                    if self.config.retry.is_exhausted(consecutive_failures) {
                        return Err(ExporterError::RetriesExhausted {
                            attempts: consecutive_failures,
                            last: Box::new(e),
                        });
                    }
                    let backoff = self.config.retry.backoff(consecutive_failures);
                    warn!("Retrying in {:?}", backoff);
                    backoff
                }
            };

            let finished = self.cursor.rows_exported >= target
                || self.config.max_passes.is_some_and(|max| passes >= max);
            if finished {
                continue;
            }
            if wait_or_shutdown(delay, shutdown.as_mut()).await {
                info!("Received shutdown signal, stopping export");
                break StopReason::Interrupted;
            }
        };

        let summary = ExportSummary {
            passes,
            failed_passes,
            rows_written,
            rows_exported: self.cursor.rows_exported,
            stop_reason,
            duration: start_time.elapsed(),
        };

        info!(
            "Export finished ({:?}): {} rows written in {} passes, {} rows in file",
            summary.stop_reason, summary.rows_written, summary.passes, summary.rows_exported
        );

        Ok(summary)
    }

    /// Fetch one page and append it to the file.
    ///
    /// Never writes past `target_records`. The source session is released
    /// before any file I/O starts. The in-memory cursor moves only once the
    /// new position is persisted.
    pub async fn export_pass(
        &mut self,
        source: &dyn UserSource,
    ) -> Result<PassOutcome, ExporterError> {
        let remaining = self
            .config
            .target_records
            .saturating_sub(self.cursor.rows_exported);
        if remaining == 0 {
            return Ok(PassOutcome::default());
        }

        let limit = usize::try_from(remaining)
            .map_or(self.config.page_size, |r| r.min(self.config.page_size));
        let request = PageRequest {
            after_id: self.cursor.last_id,
            limit,
            paging: self.config.paging,
        };

        let rows = {
            let mut session = source.open_session().await?;
            session.fetch_page(request).await?
        };

        let mut appender = CsvAppender::open(&self.config.output)?;
        let mut last_id = None;
        for row in rows.iter().take(limit) {
            appender.append(row)?;
            last_id = Some(row.id);
        }
        let written = appender.rows();
        let len = appender.finish()?;

        let mut next = self.cursor.clone();
        next.advance(last_id, written, len);
        save_checkpoint(self.store.as_ref(), &next).await?;
        self.cursor = next;

        info!("{} records exported to CSV.", written);
        Ok(PassOutcome {
            rows_fetched: rows.len(),
            rows_written: written,
        })
    }

    /// Run one pass, first reconciling the cursor with the file if the
    /// previous pass failed. Reconciliation errors fail the attempt.
    async fn attempt_pass(
        &mut self,
        source: &dyn UserSource,
    ) -> Result<PassOutcome, ExporterError> {
        if self.needs_resync {
            self.resync().await?;
            self.needs_resync = false;
        }
        self.export_pass(source).await
    }

    /// Rebuild the cursor if a failed pass left the file at another length.
    async fn resync(&mut self) -> Result<(), ExporterError> {
        let current_len = file_len(&self.config.output)?;
        if current_len == self.cursor.file_len {
            return Ok(());
        }

        warn!(
            "{} changed during a failed pass; rescanning",
            self.config.output.display()
        );
        let cursor = ExportCursor::scan(&self.config.output)?;
        save_checkpoint(self.store.as_ref(), &cursor).await?;
        self.cursor = cursor;
        info!("Cursor rebuilt at {}", self.cursor.to_cli_string());
        Ok(())
    }
}

/// Sleep for `delay`, returning early with `true` on a shutdown signal.
async fn wait_or_shutdown(
    delay: Duration,
    shutdown: Option<&mut broadcast::Receiver<()>>,
) -> bool {
    match shutdown {
        Some(shutdown) => tokio::select! {
            _ = shutdown.recv() => true,
            _ = tokio::time::sleep(delay) => false,
        },
        None => {
            tokio::time::sleep(delay).await;
            false
        }
    }
}
