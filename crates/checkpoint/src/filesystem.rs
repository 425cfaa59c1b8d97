//! Filesystem-based checkpoint storage implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::store::CheckpointStore;
use crate::CheckpointFile;

/// Filesystem implementation of CheckpointStore trait.
///
/// Stores the checkpoint as a pretty-printed JSON file. Writes go to a
/// sibling temporary file that is renamed over the target, so a crash never
/// leaves a half-written checkpoint behind.
pub struct FilesystemStore {
    path: PathBuf,
}

impl FilesystemStore {
    /// Create a new FilesystemStore writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the checkpoint file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CheckpointStore for FilesystemStore {
    async fn store(&self, file: &CheckpointFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let temp = self.temp_path();
        std::fs::write(&temp, serde_json::to_string_pretty(file)?)
            .with_context(|| format!("Failed to write checkpoint to {}", temp.display()))?;
        std::fs::rename(&temp, &self.path)
            .with_context(|| format!("Failed to move checkpoint to {}", self.path.display()))?;

        tracing::debug!("Stored checkpoint to {}", self.path.display());
        Ok(())
    }

    async fn load(&self) -> Result<Option<CheckpointFile>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read checkpoint {}", self.path.display()))?;
        let file = serde_json::from_str(&content)
            .with_context(|| format!("Invalid checkpoint file {}", self.path.display()))?;
        Ok(Some(file))
    }

    async fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            tracing::info!("Removed checkpoint {}", self.path.display());
        }
        Ok(())
    }
}
