//! Checkpoint management for user-sync
//!
//! Provides storage-agnostic checkpoint file handling for resumable jobs.
//!
//! # Architecture
//!
//! This crate provides a generic checkpoint system that:
//! - Defines the `Checkpoint` trait for job-specific checkpoint types
//! - Provides `CheckpointFile` wrapper for storage-agnostic serialization
//! - Supports multiple storage backends via `CheckpointStore` trait
//!
//! ## Storage Backends
//!
//! - `FilesystemStore` - Stores the checkpoint as a single JSON file
//! - `NullStore` - Discards checkpoints (for runs that must not resume)

mod file;
mod filesystem;
pub mod store;

#[cfg(test)]
mod tests;

pub use file::CheckpointFile;
pub use filesystem::FilesystemStore;
pub use store::{CheckpointStore, NullStore};

/// Trait that job-specific checkpoints must implement.
///
/// # Example
///
/// ```rust
/// use checkpoint::Checkpoint;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct OffsetCheckpoint {
///     pub offset: u64,
/// }
///
/// impl Checkpoint for OffsetCheckpoint {
///     const KIND: &'static str = "offset";
///
///     fn to_cli_string(&self) -> String {
///         self.offset.to_string()
///     }
/// }
/// ```
pub trait Checkpoint: serde::Serialize + for<'de> serde::Deserialize<'de> + Clone {
    /// Checkpoint kind identifier (e.g., "csv-export").
    ///
    /// Stored in every checkpoint file and validated on load, so a file
    /// written by one job is never parsed as another job's checkpoint.
    const KIND: &'static str;

    /// Short human-readable form used in log lines.
    fn to_cli_string(&self) -> String;
}

/// Load and parse the checkpoint held by `store`, if any.
pub async fn load_checkpoint<C: Checkpoint>(
    store: &dyn CheckpointStore,
) -> anyhow::Result<Option<C>> {
    match store.load().await? {
        Some(file) => Ok(Some(file.parse()?)),
        None => Ok(None),
    }
}

/// Wrap `checkpoint` in a `CheckpointFile` and persist it to `store`.
pub async fn save_checkpoint<C: Checkpoint>(
    store: &dyn CheckpointStore,
    checkpoint: &C,
) -> anyhow::Result<()> {
    let file = CheckpointFile::new(checkpoint)?;
    store.store(&file).await?;
    tracing::debug!("Saved {} checkpoint: {}", C::KIND, checkpoint.to_cli_string());
    Ok(())
}
