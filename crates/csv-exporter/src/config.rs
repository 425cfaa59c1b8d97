//! Exporter configuration.

use crate::error::ExporterError;
use crate::retry::RetryPolicy;
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default destination file.
pub const DEFAULT_OUTPUT: &str = "backup.csv";
/// Default rows per page query.
pub const DEFAULT_PAGE_SIZE: usize = 10_000;
/// Default number of data rows to reach.
pub const DEFAULT_TARGET_RECORDS: u64 = 10_000_000;
/// Default delay between passes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// How each pass chooses its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PagingMode {
    /// Continue after the last exported id (`WHERE id > ? ORDER BY id`).
    ///
    /// Rows committed with an id below the cursor after it moved past them
    /// are never exported. Concurrent multi-worker loads commit ids out of
    /// order, so run the export after the load finishes or use `Fixed`.
    #[default]
    Keyset,
    /// Always query the first page (`LIMIT ?` only). Repeated passes append
    /// the same rows again.
    Fixed,
}

/// Parameters of one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
    /// CSV file to grow.
    pub output: PathBuf,
    /// Where the export cursor is persisted.
    pub cursor_path: PathBuf,
    /// Maximum rows fetched per pass.
    pub page_size: usize,
    /// Data rows (excluding the header) at which the export stops.
    pub target_records: u64,
    /// Delay between successful passes.
    pub poll_interval: Duration,
    /// Page selection strategy.
    pub paging: PagingMode,
    /// Reaction to failed passes.
    pub retry: RetryPolicy,
    /// Stop after this many passes even if the target is not reached.
    pub max_passes: Option<u64>,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        let output = PathBuf::from(DEFAULT_OUTPUT);
        Self {
            cursor_path: default_cursor_path(&output),
            output,
            page_size: DEFAULT_PAGE_SIZE,
            target_records: DEFAULT_TARGET_RECORDS,
            poll_interval: DEFAULT_POLL_INTERVAL,
            paging: PagingMode::default(),
            retry: RetryPolicy::default(),
            max_passes: None,
        }
    }
}

impl ExporterConfig {
    /// Default configuration writing to `output`, with the cursor beside it.
    pub fn for_output(output: impl Into<PathBuf>) -> Self {
        let output = output.into();
        Self {
            cursor_path: default_cursor_path(&output),
            output,
            ..Default::default()
        }
    }

    /// Check that the configuration can run.
    pub fn validate(&self) -> Result<(), ExporterError> {
        if self.page_size == 0 {
            return Err(ExporterError::Config(
                "page size must be at least 1".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ExporterError::Config(
                "max retries must be at least 1".to_string(),
            ));
        }
        if self.cursor_path == self.output {
            return Err(ExporterError::Config(
                "cursor path must differ from the output file".to_string(),
            ));
        }
        Ok(())
    }
}

/// `<output>.cursor.json` next to the output file.
pub fn default_cursor_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".cursor.json");
    output.with_file_name(name)
}
