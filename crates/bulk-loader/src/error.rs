//! Error types for the bulk loader.

use thiserror::Error;

/// Errors that can occur during a bulk load.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// MySQL connection or query error.
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),

    /// A generated record broke the table invariants.
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] user_core::RecordError),

    /// Storage error reported by a non-MySQL sink.
    #[error("Sink error: {0}")]
    Sink(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
