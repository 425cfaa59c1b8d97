//! user-sync library
//!
//! Command handlers behind the `user-sync` binary:
//!
//! - `load` fills the MySQL `users` table with deterministic fake users using
//!   a fixed pool of concurrent workers (crate `bulk_loader`)
//! - `export` grows a CSV backup of that table page by page until it holds a
//!   target number of rows (crate `csv_exporter`)
//!
//! # CLI Usage
//!
//! ```bash
//! # Load 10 million users with 10 workers
//! user-sync load --create-table
//!
//! # Export them to backup.csv, resuming where a previous run stopped
//! user-sync export --output backup.csv
//! ```

pub mod config;
pub mod export;
pub mod load;
pub mod logging;
pub mod testing;

pub use export::{exporter_config, run_export};
pub use load::run_load;
