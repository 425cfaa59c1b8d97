//! Checkpoint file wrapper for storage-agnostic serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Checkpoint;

/// Storage-agnostic checkpoint file wrapper.
///
/// This struct wraps job-specific checkpoints with metadata for storage and
/// retrieval. The format is self-describing (includes the `kind` field) and
/// extensible (uses a JSON Value for the checkpoint data).
///
/// # File Format
///
/// ```json
/// {
///     "kind": "csv-export",
///     "checkpoint": {
///         "last_id": 20000,
///         "rows_exported": 20000,
///         "file_len": 1234567
///     },
///     "created_at": "2024-01-01T00:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointFile {
    /// Checkpoint kind identifier
    pub kind: String,
    /// Serialized checkpoint data as JSON Value
    pub checkpoint: serde_json::Value,
    /// Timestamp when this checkpoint file was created
    pub created_at: DateTime<Utc>,
}

impl CheckpointFile {
    /// Create new checkpoint file from a job-specific checkpoint.
    pub fn new<C: Checkpoint>(checkpoint: &C) -> anyhow::Result<Self> {
        Ok(Self {
            kind: C::KIND.to_string(),
            checkpoint: serde_json::to_value(checkpoint)?,
            created_at: Utc::now(),
        })
    }

    /// Parse checkpoint into the job-specific type.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The stored `kind` doesn't match `C::KIND`
    /// - The checkpoint data can't be deserialized into type `C`
    pub fn parse<C: Checkpoint>(&self) -> anyhow::Result<C> {
        if self.kind != C::KIND {
            anyhow::bail!(
                "Checkpoint type mismatch: expected '{}', found '{}'",
                C::KIND,
                self.kind
            );
        }
        Ok(serde_json::from_value(self.checkpoint.clone())?)
    }

    /// Get the kind of this checkpoint file.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Get the timestamp when this checkpoint file was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
