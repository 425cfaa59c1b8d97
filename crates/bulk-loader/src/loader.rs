//! Loader orchestration: spawn one task per worker range and wait for all.

use crate::config::LoaderConfig;
use crate::error::LoaderError;
use crate::partition::{partition, Partition};
use crate::sink::UserSink;
use crate::worker::{run_worker, WorkerReport};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Aggregate outcome of a bulk load.
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    /// One report per worker, ordered by worker id.
    pub reports: Vec<WorkerReport>,
    /// Records dropped because the total was not divisible by the worker count.
    pub dropped_records: u64,
    /// Wall-clock time of the whole load.
    pub total_duration: Duration,
}

impl LoadSummary {
    /// Rows inserted across all workers.
    pub fn rows_inserted(&self) -> u64 {
        self.reports.iter().map(|r| r.inserted).sum()
    }

    /// Batches flushed across all workers.
    pub fn batch_count(&self) -> u64 {
        self.reports.iter().map(|r| r.batches).sum()
    }

    /// Reports of workers that stopped early.
    pub fn failed_workers(&self) -> Vec<&WorkerReport> {
        self.reports.iter().filter(|r| !r.is_success()).collect()
    }

    /// Whether every worker inserted its whole range.
    pub fn is_success(&self) -> bool {
        self.reports.iter().all(WorkerReport::is_success)
    }

    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_inserted() as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Bulk loader that fans a record count out over independent workers.
pub struct BulkLoader {
    config: LoaderConfig,
}

impl BulkLoader {
    /// Create a loader, validating the configuration.
    pub fn new(config: LoaderConfig) -> Result<Self, LoaderError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// The worker ranges this loader will run.
    pub fn plan(&self) -> Partition {
        partition(self.config.total_records, self.config.worker_count)
    }

    /// Run every worker against `sink` and wait until all have finished.
    ///
    /// Workers do not cancel each other: a failed worker is recorded in the
    /// summary while the others carry on.
    pub async fn run(&self, sink: Arc<dyn UserSink>) -> LoadSummary {
        let start_time = Instant::now();
        let plan = self.plan();

        if plan.dropped > 0 {
            warn!(
                "{} records are not divisible across {} workers; dropping {} records",
                self.config.total_records, self.config.worker_count, plan.dropped
            );
        }

        info!(
            "Starting {} workers for {} records (flush size: {})",
            plan.ranges.len(),
            self.config.total_records - plan.dropped,
            self.config.flush_size
        );

        let mut pending = BTreeMap::new();
        let mut tasks = JoinSet::new();
        for (worker_id, range) in plan.ranges.into_iter().enumerate() {
            pending.insert(worker_id, range);
            tasks.spawn(run_worker(
                worker_id,
                range,
                Arc::clone(&sink),
                self.config.clone(),
            ));
        }

        let mut reports = Vec::with_capacity(pending.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => {
                    pending.remove(&report.worker_id);
                    reports.push(report);
                }
                Err(e) => error!("Worker task failed: {}", e),
            }
        }

        // Any worker still pending died without reporting
        for (worker_id, range) in pending {
            reports.push(WorkerReport::lost(
                worker_id,
                range,
                "worker task terminated before reporting".to_string(),
            ));
        }
        reports.sort_by_key(|r| r.worker_id);

        let summary = LoadSummary {
            reports,
            dropped_records: plan.dropped,
            total_duration: start_time.elapsed(),
        };

        info!(
            "Load complete: {} rows in {:?} ({:.2} rows/sec), {} failed workers",
            summary.rows_inserted(),
            summary.total_duration,
            summary.rows_per_second(),
            summary.failed_workers().len()
        );

        summary
    }
}
