//! Error types for the CSV exporter.

use thiserror::Error;

/// Errors that can occur during an export.
#[derive(Error, Debug)]
pub enum ExporterError {
    /// MySQL connection or query error.
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Cursor could not be loaded or saved.
    #[error("Checkpoint error: {0:#}")]
    Checkpoint(#[from] anyhow::Error),

    /// The destination file holds a row the exporter cannot read back.
    #[error("Invalid row in {path} at line {line}: {reason}")]
    InvalidRow {
        path: String,
        line: u64,
        reason: String,
    },

    /// Storage error reported by a non-MySQL source.
    #[error("Source error: {0}")]
    Source(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Consecutive pass failures reached the retry limit.
    #[error("Export gave up after {attempts} consecutive failed passes: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ExporterError>,
    },
}
