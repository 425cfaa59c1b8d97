//! Loader configuration.

use crate::error::LoaderError;
use crate::insert::{max_rows_per_statement, DEFAULT_FLUSH_SIZE};

/// Default number of records to insert.
pub const DEFAULT_TOTAL_RECORDS: u64 = 10_000_000;
/// Default number of concurrent workers.
pub const DEFAULT_WORKER_COUNT: usize = 10;
/// Default per-worker progress log interval.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;
/// Default generator seed.
pub const DEFAULT_SEED: u64 = 42;

/// Parameters of one bulk load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Total number of logical records to split across workers.
    pub total_records: u64,
    /// Number of independent workers.
    pub worker_count: usize,
    /// Pending records that trigger a batch flush.
    pub flush_size: usize,
    /// A worker logs a progress line each time its inserted count crosses a
    /// multiple of this value. Zero disables progress lines.
    pub progress_interval: u64,
    /// Generator seed.
    pub seed: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            total_records: DEFAULT_TOTAL_RECORDS,
            worker_count: DEFAULT_WORKER_COUNT,
            flush_size: DEFAULT_FLUSH_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            seed: DEFAULT_SEED,
        }
    }
}

impl LoaderConfig {
    /// Check that the configuration can run.
    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.worker_count == 0 {
            return Err(LoaderError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.flush_size == 0 {
            return Err(LoaderError::Config(
                "flush size must be at least 1".to_string(),
            ));
        }
        let max_rows = max_rows_per_statement();
        if self.flush_size > max_rows {
            return Err(LoaderError::Config(format!(
                "flush size {} exceeds the {} rows a single INSERT can carry",
                self.flush_size, max_rows
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LoaderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.total_records, 10_000_000);
        assert_eq!(config.worker_count, 10);
        assert_eq!(config.flush_size, 1000);
    }

    #[test]
    fn test_rejects_zero_workers() {
        let config = LoaderConfig {
            worker_count: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(LoaderError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_flush_size() {
        let config = LoaderConfig {
            flush_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(LoaderError::Config(_))));
    }

    #[test]
    fn test_rejects_oversized_flush() {
        let config = LoaderConfig {
            flush_size: 20_000,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(LoaderError::Config(_))));
    }
}
