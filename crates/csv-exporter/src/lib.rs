//! Polling CSV exporter for the users table.
//!
//! Each pass fetches one bounded page of users and appends it to a CSV file,
//! until the file holds a target number of data rows. The export position is
//! kept in a cursor that is persisted after every pass, so a restarted export
//! neither re-counts the file nor re-exports rows.
//!
//! # Architecture
//!
//! ```text
//!   UserSource ──fetch_page──▶ CsvExporter ──append──▶ CsvAppender ──▶ backup.csv
//!                                  │
//!                                  └──save──▶ ExportCursor ──▶ backup.csv.cursor.json
//! ```
//!
//! # Example
//!
//! ```ignore
//! use checkpoint::FilesystemStore;
//! use csv_exporter::{CsvExporter, ExporterConfig, MySqlSource};
//!
//! let config = ExporterConfig::default();
//! let store = FilesystemStore::new(config.cursor_path.clone());
//! let source = MySqlSource::new("mysql://root@localhost:3306/users_db")?;
//! let mut exporter = CsvExporter::open(config, Box::new(store)).await?;
//! let summary = exporter.run(&source, None).await?;
//! ```

pub mod args;
mod config;
mod cursor;
mod error;
mod exporter;
pub mod memory;
mod retry;
mod source;
mod writer;

pub use args::ExportArgs;
pub use config::{default_cursor_path, ExporterConfig, PagingMode};
pub use cursor::ExportCursor;
pub use error::ExporterError;
pub use exporter::{CsvExporter, ExportSummary, PassOutcome, StopReason};
pub use memory::MemorySource;
pub use retry::RetryPolicy;
pub use source::{build_page_query, MySqlSource, PageRequest, SourceSession, UserSource};
pub use writer::{file_len, CsvAppender};
