//! User records as generated by the loader and read back by the exporter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a record violates the table's invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A required field is empty.
    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),
}

/// A synthetic user awaiting insertion.
///
/// `UserRecord` has no identity: the database assigns the auto-incrementing
/// `id` on insert, and the loader never reads the row back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
}

impl UserRecord {
    /// Create a new user record.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            address: address.into(),
        }
    }

    /// Check that every field carries a value.
    pub fn validate(&self) -> Result<(), RecordError> {
        for (name, value) in self.fields() {
            if value.trim().is_empty() {
                return Err(RecordError::EmptyField(name));
            }
        }
        Ok(())
    }

    /// Field values in insert-column order.
    pub fn values(&self) -> [&str; 4] {
        [
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.address.as_str(),
        ]
    }

    fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
            ("email", self.email.as_str()),
            ("address", self.address.as_str()),
        ]
    }

    /// Attach a database-assigned id, producing the row the exporter sees.
    pub fn with_id(self, id: u64) -> ExportRow {
        ExportRow {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            address: self.address,
        }
    }
}

/// A persisted user row as returned by an export page query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
}

impl ExportRow {
    /// Convert to a CSV record in header order.
    pub fn to_csv_record(&self) -> [String; 5] {
        [
            self.id.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.address.clone(),
        ]
    }
}
