//! Persisted export position.

use crate::error::ExporterError;
use crate::writer::file_len;
use checkpoint::{load_checkpoint, save_checkpoint, Checkpoint, CheckpointStore};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{info, warn};
use user_core::CSV_HEADER;

/// How far the destination file has been filled.
///
/// `file_len` ties the cursor to one state of the file: a cursor whose
/// length disagrees with the file on disk is stale and gets rebuilt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportCursor {
    /// Highest id written to the file.
    pub last_id: Option<u64>,
    /// Data rows in the file, excluding the header.
    pub rows_exported: u64,
    /// File length in bytes when the cursor was taken.
    pub file_len: u64,
}

impl Checkpoint for ExportCursor {
    const KIND: &'static str = "csv-export";

    fn to_cli_string(&self) -> String {
        match self.last_id {
            Some(id) => format!("{} rows, last id {}", self.rows_exported, id),
            None => format!("{} rows", self.rows_exported),
        }
    }
}

impl ExportCursor {
    /// Rebuild the cursor by reading the whole file.
    ///
    /// A missing file yields an empty cursor. A last row that was cut off
    /// mid-write (no line terminator, or too few fields) is truncated from
    /// the file and not counted, so the next append starts on a fresh line.
    pub fn scan(path: &Path) -> Result<Self, ExporterError> {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        let file_len = file.metadata()?.len();
        let terminated = ends_with_newline(&mut file, file_len)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut cursor = Self {
            file_len,
            ..Default::default()
        };
        let mut record = StringRecord::new();
        let mut header = true;
        while reader.read_record(&mut record)? {
            let start = record.position().map_or(0, |p| p.byte());
            let line = record.position().map_or(0, |p| p.line());
            let last = reader.position().byte() >= file_len;
            let short = record.len() < CSV_HEADER.len();

            if last && (!terminated || short) {
                cursor.file_len = start;
                break;
            }
            if header {
                header = false;
                continue;
            }
            if short {
                return Err(ExporterError::InvalidRow {
                    path: path.display().to_string(),
                    line,
                    reason: format!(
                        "expected {} fields, found {}",
                        CSV_HEADER.len(),
                        record.len()
                    ),
                });
            }

            let field = record.get(0).unwrap_or_default().trim();
            let id = field.parse::<u64>().map_err(|e| ExporterError::InvalidRow {
                path: path.display().to_string(),
                line,
                reason: format!("invalid id {field:?}: {e}"),
            })?;
            cursor.rows_exported += 1;
            cursor.last_id = cursor.last_id.max(Some(id));
        }

        if cursor.file_len < file_len {
            warn!(
                "Truncating partially written row at byte {} of {}",
                cursor.file_len,
                path.display()
            );
            OpenOptions::new()
                .write(true)
                .open(path)?
                .set_len(cursor.file_len)?;
        }
        Ok(cursor)
    }

    /// Load the persisted cursor for `output`, rescanning the file when the
    /// cursor is missing, unreadable or stale. A rebuilt cursor is saved.
    pub async fn recover(
        store: &dyn CheckpointStore,
        output: &Path,
    ) -> Result<Self, ExporterError> {
        let current_len = file_len(output)?;

        match load_checkpoint::<Self>(store).await {
            Ok(Some(cursor)) if cursor.file_len == current_len => {
                info!("Resuming export at {}", cursor.to_cli_string());
                return Ok(cursor);
            }
            Ok(Some(cursor)) => warn!(
                "Cursor records {} bytes but {} has {}; rescanning",
                cursor.file_len,
                output.display(),
                current_len
            ),
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable cursor: {:#}", e),
        }

        let cursor = Self::scan(output)?;
        if cursor.file_len > 0 {
            info!(
                "Scanned {}: {}",
                output.display(),
                cursor.to_cli_string()
            );
        }
        save_checkpoint(store, &cursor).await?;
        Ok(cursor)
    }

    /// Record a pass that appended `written` rows ending at `last_id`.
    pub fn advance(&mut self, last_id: Option<u64>, written: u64, file_len: u64) {
        self.last_id = self.last_id.max(last_id);
        self.rows_exported += written;
        self.file_len = file_len;
    }
}

fn ends_with_newline(file: &mut File, len: u64) -> std::io::Result<bool> {
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    file.rewind()?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkpoint::{FilesystemStore, NullStore};
    use tempfile::TempDir;

    const HEADER: &str = "ID,First Name,Last Name,Email,Address\n";

    fn write_csv(path: &Path, ids: &[u64]) {
        let mut content = HEADER.to_string();
        for id in ids {
            content.push_str(&format!("{id},Ada,Lovelace,ada{id}@example.com,1 Main St\n"));
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_missing_file() {
        let dir = TempDir::new().unwrap();
        let cursor = ExportCursor::scan(&dir.path().join("none.csv")).unwrap();
        assert_eq!(cursor, ExportCursor::default());
    }

    #[test]
    fn test_scan_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, HEADER).unwrap();

        let cursor = ExportCursor::scan(&path).unwrap();

        assert_eq!(cursor.rows_exported, 0);
        assert_eq!(cursor.last_id, None);
        assert_eq!(cursor.file_len, HEADER.len() as u64);
    }

    #[test]
    fn test_scan_counts_rows_and_last_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[1, 2, 3, 7]);

        let cursor = ExportCursor::scan(&path).unwrap();

        assert_eq!(cursor.rows_exported, 4);
        assert_eq!(cursor.last_id, Some(7));
    }

    #[test]
    fn test_scan_rejects_bad_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, format!("{HEADER}abc,Ada,Lovelace,a@b.c,1 Main St\n")).unwrap();

        let err = ExportCursor::scan(&path).unwrap_err();
        assert!(matches!(err, ExporterError::InvalidRow { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_scan_truncates_torn_last_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[1, 2, 3]);
        let complete = file_len(&path).unwrap();
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("4,F4,L");
        std::fs::write(&path, content).unwrap();

        let cursor = ExportCursor::scan(&path).unwrap();

        assert_eq!(cursor.rows_exported, 3);
        assert_eq!(cursor.last_id, Some(3));
        assert_eq!(cursor.file_len, complete);
        assert_eq!(file_len(&path).unwrap(), complete);
        assert!(std::fs::read_to_string(&path).unwrap().ends_with("1 Main St\n"));
    }

    #[test]
    fn test_scan_truncates_full_row_without_terminator() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[1, 2]);
        let complete = file_len(&path).unwrap();
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("3,Ada,Lovelace,ada3@example.com,1 Main St");
        std::fs::write(&path, content).unwrap();

        let cursor = ExportCursor::scan(&path).unwrap();

        assert_eq!(cursor.rows_exported, 2);
        assert_eq!(cursor.last_id, Some(2));
        assert_eq!(file_len(&path).unwrap(), complete);
    }

    #[test]
    fn test_scan_truncates_torn_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "ID,First Na").unwrap();

        let cursor = ExportCursor::scan(&path).unwrap();

        assert_eq!(cursor, ExportCursor::default());
        assert_eq!(file_len(&path).unwrap(), 0);
    }

    #[test]
    fn test_scan_rejects_short_row_before_end() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(
            &path,
            format!("{HEADER}1,Ada\n2,Ada,Lovelace,a@b.c,1 Main St\n"),
        )
        .unwrap();

        let err = ExportCursor::scan(&path).unwrap_err();
        assert!(matches!(err, ExporterError::InvalidRow { line: 2, .. }), "{err}");
    }

    #[tokio::test]
    async fn test_recover_trusts_matching_cursor() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[1, 2]);
        let store = FilesystemStore::new(dir.path().join("cursor.json"));

        let saved = ExportCursor {
            last_id: Some(500),
            rows_exported: 99,
            file_len: file_len(&path).unwrap(),
        };
        save_checkpoint(&store, &saved).await.unwrap();

        let cursor = ExportCursor::recover(&store, &path).await.unwrap();
        assert_eq!(cursor, saved);
    }

    #[tokio::test]
    async fn test_recover_rescans_stale_cursor() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[1, 2, 3]);
        let store = FilesystemStore::new(dir.path().join("cursor.json"));

        let stale = ExportCursor {
            last_id: Some(1),
            rows_exported: 1,
            file_len: 10,
        };
        save_checkpoint(&store, &stale).await.unwrap();

        let cursor = ExportCursor::recover(&store, &path).await.unwrap();
        assert_eq!(cursor.rows_exported, 3);
        assert_eq!(cursor.last_id, Some(3));

        let persisted: ExportCursor = load_checkpoint(&store).await.unwrap().unwrap();
        assert_eq!(persisted, cursor);
    }

    #[tokio::test]
    async fn test_recover_without_cursor_or_file() {
        let dir = TempDir::new().unwrap();
        let cursor = ExportCursor::recover(&NullStore, &dir.path().join("out.csv"))
            .await
            .unwrap();
        assert_eq!(cursor, ExportCursor::default());
    }

    #[test]
    fn test_advance_keeps_highest_id() {
        let mut cursor = ExportCursor {
            last_id: Some(10),
            rows_exported: 10,
            file_len: 100,
        };
        cursor.advance(Some(20), 10, 200);
        assert_eq!(cursor.last_id, Some(20));
        assert_eq!(cursor.rows_exported, 20);

        cursor.advance(None, 0, 200);
        assert_eq!(cursor.last_id, Some(20));
        assert_eq!(cursor.file_len, 200);
    }
}
