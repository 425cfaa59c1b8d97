//! Load users into MySQL, export them to CSV and compare.

use bulk_loader::{BulkLoader, LoaderConfig, MySqlSink};
use checkpoint::FilesystemStore;
use csv_exporter::{CsvExporter, ExporterConfig, MySqlSource, StopReason};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use user_generator::UserGenerator;
use user_sync::testing::mysql::{create_mysql_config, reset_users_table};

#[tokio::test]
#[ignore = "Requires a running MySQL server (MYSQL_TEST_URL)"]
async fn test_mysql_load_then_export() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("bulk_loader=debug,csv_exporter=debug")
        .try_init()
        .ok();

    let mysql_config = create_mysql_config();
    reset_users_table(&mysql_config).await?;

    let sink = MySqlSink::new(&mysql_config.get_connection_string())?;
    let sink = Arc::new(sink);
    let loader = BulkLoader::new(LoaderConfig {
        total_records: 100,
        worker_count: 10,
        flush_size: 1000,
        progress_interval: 0,
        seed: 42,
    })?;
    let summary = loader.run(sink.clone()).await;
    assert!(summary.is_success());
    assert_eq!(summary.rows_inserted(), 100);
    assert_eq!(summary.batch_count(), 10);
    assert_eq!(sink.row_count().await?, 100);

    let dir = TempDir::new()?;
    let config = ExporterConfig {
        page_size: 40,
        target_records: 100,
        poll_interval: Duration::from_millis(10),
        ..ExporterConfig::for_output(dir.path().join("backup.csv"))
    };
    let store = FilesystemStore::new(config.cursor_path.clone());
    let source = MySqlSource::new(&mysql_config.get_connection_string())?;
    let mut exporter = CsvExporter::open(config, Box::new(store)).await?;

    let export = exporter.run(&source, None).await?;
    assert_eq!(export.stop_reason, StopReason::TargetReached);
    assert_eq!(export.passes, 3);

    let mut reader = csv::Reader::from_path(dir.path().join("backup.csv"))?;
    let mut emails: Vec<String> = reader
        .records()
        .map(|r| r.map(|r| r[3].to_string()))
        .collect::<Result<_, _>>()?;
    let mut expected: Vec<String> = UserGenerator::new(42)
        .users(100)
        .map(|u| u.email)
        .collect();
    emails.sort();
    expected.sort();
    assert_eq!(emails, expected);

    source.disconnect().await?;
    Ok(())
}
