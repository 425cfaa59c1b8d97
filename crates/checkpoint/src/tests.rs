//! Unit tests for the checkpoint crate.

use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use crate::{
    load_checkpoint, save_checkpoint, Checkpoint, CheckpointFile, CheckpointStore,
    FilesystemStore, NullStore,
};

/// Test checkpoint type for unit tests.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
struct TestCheckpoint {
    value: i64,
}

impl Checkpoint for TestCheckpoint {
    const KIND: &'static str = "test";

    fn to_cli_string(&self) -> String {
        self.value.to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
struct OtherCheckpoint {
    value: i64,
}

impl Checkpoint for OtherCheckpoint {
    const KIND: &'static str = "other";

    fn to_cli_string(&self) -> String {
        self.value.to_string()
    }
}

// ============================================================================
// CheckpointFile Tests
// ============================================================================

#[test]
fn test_checkpoint_file_serialization() {
    let cp = TestCheckpoint { value: 42 };
    let file = CheckpointFile::new(&cp).unwrap();

    assert_eq!(file.kind(), "test");

    let parsed: TestCheckpoint = file.parse().unwrap();
    assert_eq!(parsed, cp);
}

#[test]
fn test_checkpoint_file_roundtrip_through_json() {
    let original = TestCheckpoint { value: 12345 };
    let file = CheckpointFile::new(&original).unwrap();

    let json = serde_json::to_string_pretty(&file).unwrap();
    let loaded: CheckpointFile = serde_json::from_str(&json).unwrap();

    assert_eq!(loaded.parse::<TestCheckpoint>().unwrap(), original);
    assert_eq!(loaded.created_at(), file.created_at());
}

#[test]
fn test_checkpoint_file_kind_mismatch() {
    let file = CheckpointFile::new(&TestCheckpoint { value: 1 }).unwrap();
    let err = file.parse::<OtherCheckpoint>().unwrap_err();
    assert!(err.to_string().contains("type mismatch"));
}

// ============================================================================
// Store Tests
// ============================================================================

#[tokio::test]
async fn test_filesystem_store_roundtrip() {
    let dir = TempDir::new().unwrap();
    let store = FilesystemStore::new(dir.path().join("nested").join("cursor.json"));

    assert!(load_checkpoint::<TestCheckpoint>(&store)
        .await
        .unwrap()
        .is_none());

    save_checkpoint(&store, &TestCheckpoint { value: 7 })
        .await
        .unwrap();
    save_checkpoint(&store, &TestCheckpoint { value: 8 })
        .await
        .unwrap();

    let loaded: TestCheckpoint = load_checkpoint(&store).await.unwrap().unwrap();
    assert_eq!(loaded.value, 8);
    assert!(!dir.path().join("nested").join("cursor.json.tmp").exists());
}

#[tokio::test]
async fn test_filesystem_store_clear() {
    let dir = TempDir::new().unwrap();
    let store = FilesystemStore::new(dir.path().join("cursor.json"));

    save_checkpoint(&store, &TestCheckpoint { value: 1 })
        .await
        .unwrap();
    assert!(store.path().exists());

    store.clear().await.unwrap();
    assert!(!store.path().exists());
    // Clearing twice is fine
    store.clear().await.unwrap();
}

#[tokio::test]
async fn test_filesystem_store_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cursor.json");
    std::fs::write(&path, "not json").unwrap();

    let store = FilesystemStore::new(&path);
    assert!(store.load().await.is_err());
}

#[tokio::test]
async fn test_null_store_discards() {
    let store = NullStore;
    save_checkpoint(&store, &TestCheckpoint { value: 3 })
        .await
        .unwrap();
    assert!(load_checkpoint::<TestCheckpoint>(&store)
        .await
        .unwrap()
        .is_none());
}
