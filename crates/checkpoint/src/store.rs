//! Checkpoint storage trait and the no-op store.

use anyhow::Result;
use async_trait::async_trait;

use crate::CheckpointFile;

/// Trait for checkpoint storage operations.
///
/// A store holds at most one checkpoint: the latest one written.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Persist a checkpoint, replacing any previous one.
    async fn store(&self, file: &CheckpointFile) -> Result<()>;

    /// Read the stored checkpoint.
    ///
    /// Returns None if no checkpoint has been stored.
    async fn load(&self) -> Result<Option<CheckpointFile>>;

    /// Remove the stored checkpoint, if any.
    async fn clear(&self) -> Result<()>;
}

/// Store that discards every checkpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

#[async_trait]
impl CheckpointStore for NullStore {
    async fn store(&self, _file: &CheckpointFile) -> Result<()> {
        Ok(())
    }

    async fn load(&self) -> Result<Option<CheckpointFile>> {
        Ok(None)
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}
