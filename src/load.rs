//! `user-sync load` command handler.

use crate::logging::mask_connection_password;
use anyhow::Context;
use bulk_loader::{BulkLoader, LoadArgs, LoadSummary, LoaderConfig, MySqlSink};
use std::sync::Arc;

/// Run the bulk loader against MySQL.
///
/// Every worker runs to completion before the result is decided; the
/// command fails if any worker stopped early.
pub async fn run_load(args: LoadArgs) -> anyhow::Result<()> {
    let config = LoaderConfig::from(&args);
    let loader = BulkLoader::new(config).context("Invalid loader configuration")?;

    if args.dry_run {
        let plan = loader.plan();
        tracing::info!(
            "[DRY-RUN] Would load {} users with {} workers (flush size {}, seed {})",
            loader.config().total_records - plan.dropped,
            loader.config().worker_count,
            loader.config().flush_size,
            loader.config().seed
        );
        tracing::info!(
            "[DRY-RUN] Connection: {}",
            mask_connection_password(&args.mysql_connection_string)
        );
        for (worker_id, range) in plan.ranges.iter().enumerate() {
            tracing::info!("[DRY-RUN] Worker {}: {}", worker_id, range);
        }
        if plan.dropped > 0 {
            tracing::warn!("[DRY-RUN] {} records would be dropped", plan.dropped);
        }
        return Ok(());
    }

    tracing::info!(
        "Loading users into {}",
        mask_connection_password(&args.mysql_connection_string)
    );

    let sink = MySqlSink::new(&args.mysql_connection_string)
        .context("Invalid MySQL connection string")?;
    if args.create_table {
        sink.create_table()
            .await
            .context("Failed to create users table")?;
    }

    let sink = Arc::new(sink);
    let summary = loader.run(sink.clone()).await;

    match Arc::try_unwrap(sink) {
        Ok(sink) => {
            if let Err(e) = sink.disconnect().await {
                tracing::warn!("Failed to close MySQL connections: {}", e);
            }
        }
        Err(_) => tracing::debug!("MySQL pool still shared; skipping disconnect"),
    }

    check_summary(&summary)
}

/// Log the outcome of every failed worker and fail if there is any.
fn check_summary(summary: &LoadSummary) -> anyhow::Result<()> {
    let failed = summary.failed_workers();
    for report in &failed {
        tracing::error!(
            "Worker {} stopped after {} of {} rows: {}",
            report.worker_id,
            report.inserted,
            report.range.len(),
            report.error.as_deref().unwrap_or("unknown error")
        );
    }

    if !failed.is_empty() {
        anyhow::bail!(
            "{} of {} workers failed ({} rows inserted)",
            failed.len(),
            summary.reports.len(),
            summary.rows_inserted()
        );
    }

    tracing::info!(
        "Loaded {} users in {:?} ({:.2} rows/sec)",
        summary.rows_inserted(),
        summary.total_duration,
        summary.rows_per_second()
    );
    Ok(())
}
