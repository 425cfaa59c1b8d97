//! `user-sync export` command handler.

use crate::config::parse_duration;
use crate::logging::mask_connection_password;
use anyhow::Context;
use checkpoint::FilesystemStore;
use csv_exporter::{
    default_cursor_path, CsvExporter, ExportArgs, ExporterConfig, MySqlSource, RetryPolicy,
};

/// Build the exporter configuration from command-line arguments.
pub fn exporter_config(args: &ExportArgs) -> anyhow::Result<ExporterConfig> {
    let poll_interval = parse_duration(&args.poll_interval)
        .with_context(|| format!("Invalid --poll-interval: {}", args.poll_interval))?;
    let initial_backoff = parse_duration(&args.initial_backoff)
        .with_context(|| format!("Invalid --initial-backoff: {}", args.initial_backoff))?;
    let max_backoff = parse_duration(&args.max_backoff)
        .with_context(|| format!("Invalid --max-backoff: {}", args.max_backoff))?;

    let config = ExporterConfig {
        output: args.output.clone(),
        cursor_path: args
            .cursor
            .clone()
            .unwrap_or_else(|| default_cursor_path(&args.output)),
        page_size: args.page_size,
        target_records: args.target_records,
        poll_interval,
        paging: args.paging,
        retry: RetryPolicy {
            max_attempts: args.max_retries,
            initial_backoff,
            max_backoff,
        },
        max_passes: args.max_passes,
    };
    config.validate()?;
    Ok(config)
}

/// Run the polling CSV export against MySQL until it stops.
pub async fn run_export(args: ExportArgs) -> anyhow::Result<()> {
    let config = exporter_config(&args)?;
    let store = FilesystemStore::new(config.cursor_path.clone());

    if args.reset {
        tracing::info!(
            "Resetting {} and {}",
            config.output.display(),
            config.cursor_path.display()
        );
        CsvExporter::reset(&config.output, &store)
            .await
            .context("Failed to reset export")?;
    }

    tracing::info!(
        "Exporting users from {}",
        mask_connection_password(&args.mysql_connection_string)
    );
    let source = MySqlSource::new(&args.mysql_connection_string)
        .context("Invalid MySQL connection string")?;

    let mut exporter = CsvExporter::open(config, Box::new(store))
        .await
        .context("Failed to open export")?;
    let shutdown = setup_shutdown_handler();
    let result = exporter.run(&source, Some(shutdown)).await;

    if let Err(e) = source.disconnect().await {
        tracing::warn!("Failed to close MySQL connections: {}", e);
    }

    let summary = result.context("Export failed")?;
    tracing::info!(
        "{} records in {} after {} passes ({} failed) in {:?}",
        summary.rows_exported,
        exporter.config().output.display(),
        summary.passes,
        summary.failed_passes,
        summary.duration
    );
    Ok(())
}

/// Sets up a shutdown signal handler
fn setup_shutdown_handler() -> tokio::sync::broadcast::Receiver<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            // Keep the sender alive so the export is not stopped
            std::future::pending::<()>().await;
        }

        tracing::info!("Received interrupt signal (Ctrl+C)");
        let _ = shutdown_tx.send(());
    });

    shutdown_rx
}
