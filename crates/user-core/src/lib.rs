//! Core types for the user-sync tools.
//!
//! This crate provides the record types shared by the bulk loader and the
//! CSV exporter:
//!
//! - [`UserRecord`] - A synthetic user awaiting insertion (no identity yet)
//! - [`ExportRow`] - A persisted user read back from the `users` table
//! - [`table`] - Table, column and CSV header constants
//!
//! # Architecture
//!
//! ```text
//! user-core (this crate)
//!    │
//!    ├─── user-generator  (produces UserRecord values)
//!    ├─── bulk-loader     (inserts UserRecord batches)
//!    └─── csv-exporter    (reads ExportRow pages, writes CSV)
//! ```

pub mod record;
pub mod table;

pub use record::{ExportRow, RecordError, UserRecord};
pub use table::{CSV_HEADER, DEFAULT_MYSQL_URL, INSERT_COLUMNS, SELECT_COLUMNS, USERS_TABLE};
