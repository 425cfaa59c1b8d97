//! Concurrent bulk loader for synthetic users.
//!
//! The loader splits a fixed number of logical records across a fixed number
//! of workers. Each worker owns one database session for its whole lifetime,
//! generates its slice of users and flushes them in batched INSERTs.
//!
//! # Example
//!
//! ```ignore
//! use bulk_loader::{BulkLoader, LoaderConfig, MySqlSink};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MySqlSink::new("mysql://root@localhost:3306/users_db")?);
//! let loader = BulkLoader::new(LoaderConfig::default())?;
//! let summary = loader.run(sink).await;
//! println!("{} rows inserted", summary.rows_inserted());
//! ```

pub mod args;
mod config;
mod error;
pub mod insert;
mod loader;
pub mod memory;
mod partition;
mod sink;
mod worker;

pub use args::LoadArgs;
pub use config::LoaderConfig;
pub use error::LoaderError;
pub use loader::{BulkLoader, LoadSummary};
pub use memory::MemorySink;
pub use partition::{partition, Partition, WorkerRange};
pub use sink::{MySqlSink, SinkSession, UserSink};
pub use worker::{run_worker, WorkerReport};
