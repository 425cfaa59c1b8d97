//! Append-only CSV output.

use crate::error::ExporterError;
use csv::{Terminator, Writer, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::path::Path;
use user_core::{ExportRow, CSV_HEADER};

/// Appends rows to the destination file for the duration of one pass.
///
/// The header is written when the file is empty on open. Fields are quoted
/// only when they contain a delimiter, quote or line break.
pub struct CsvAppender {
    writer: Writer<File>,
    rows: u64,
}

impl CsvAppender {
    /// Open `path` for appending, creating it and its parent directory.
    pub fn open(path: &Path) -> Result<Self, ExporterError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(file);
        if needs_header {
            writer.write_record(CSV_HEADER)?;
        }

        Ok(Self { writer, rows: 0 })
    }

    /// Append one data row.
    pub fn append(&mut self, row: &ExportRow) -> Result<(), ExporterError> {
        self.writer.write_record(row.to_csv_record())?;
        self.rows += 1;
        Ok(())
    }

    /// Rows appended through this appender.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and close the file, returning its length in bytes.
    pub fn finish(self) -> Result<u64, ExporterError> {
        let file = self.writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_data()?;
        Ok(file.metadata()?.len())
    }
}

/// Current length of `path`, or 0 if it does not exist.
pub fn file_len(path: &Path) -> Result<u64, ExporterError> {
    match std::fs::metadata(path) {
        Ok(metadata) => Ok(metadata.len()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e.into()),
    }
}
