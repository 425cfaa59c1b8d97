//! Where export pages come from.

use crate::config::PagingMode;
use crate::error::ExporterError;
use async_trait::async_trait;
use mysql_async::{prelude::*, Conn, Pool};
use tracing::debug;
use user_core::{ExportRow, SELECT_COLUMNS, USERS_TABLE};

/// One page query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Highest id already exported (keyset paging only).
    pub after_id: Option<u64>,
    /// Maximum rows to return.
    pub limit: usize,
    /// Page selection strategy.
    pub paging: PagingMode,
}

/// A table the exporter can read pages from.
///
/// The exporter opens one session per pass and drops it when the pass ends,
/// whether or not the pass succeeded.
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Open the session used for a single pass.
    async fn open_session(&self) -> Result<Box<dyn SourceSession>, ExporterError>;
}

/// A live connection to a source.
#[async_trait]
pub trait SourceSession: Send {
    /// Fetch at most `request.limit` rows.
    async fn fetch_page(&mut self, request: PageRequest) -> Result<Vec<ExportRow>, ExporterError>;
}

/// Build the page query for `paging`.
pub fn build_page_query(paging: PagingMode) -> String {
    let columns = SELECT_COLUMNS.join(", ");
    match paging {
        PagingMode::Keyset => format!(
            "SELECT {columns} FROM `{USERS_TABLE}` WHERE id > ? ORDER BY id LIMIT ?"
        ),
        PagingMode::Fixed => format!("SELECT {columns} FROM `{USERS_TABLE}` LIMIT ?"),
    }
}

/// MySQL source backed by a connection pool.
pub struct MySqlSource {
    pool: Pool,
}

impl MySqlSource {
    /// Create a source for the given connection string.
    pub fn new(connection_string: &str) -> Result<Self, ExporterError> {
        let pool = Pool::from_url(connection_string)?;
        Ok(Self { pool })
    }

    /// Close every pooled connection.
    pub async fn disconnect(self) -> Result<(), ExporterError> {
        self.pool.disconnect().await?;
        Ok(())
    }
}

#[async_trait]
impl UserSource for MySqlSource {
    async fn open_session(&self) -> Result<Box<dyn SourceSession>, ExporterError> {
        let conn = self.pool.get_conn().await?;
        Ok(Box::new(MySqlSession { conn }))
    }
}

struct MySqlSession {
    conn: Conn,
}

type UserRow = (u64, String, String, String, String);

fn into_export_row((id, first_name, last_name, email, address): UserRow) -> ExportRow {
    ExportRow {
        id,
        first_name,
        last_name,
        email,
        address,
    }
}

#[async_trait]
impl SourceSession for MySqlSession {
    async fn fetch_page(&mut self, request: PageRequest) -> Result<Vec<ExportRow>, ExporterError> {
        let sql = build_page_query(request.paging);
        let limit = request.limit as u64;
        debug!("Page query: {} (after {:?}, limit {})", sql, request.after_id, limit);

        let rows = match request.paging {
            PagingMode::Keyset => {
                let after = request.after_id.unwrap_or(0);
                self.conn
                    .exec_map(sql, (after, limit), into_export_row)
                    .await?
            }
            PagingMode::Fixed => self.conn.exec_map(sql, (limit,), into_export_row).await?,
        };
        Ok(rows)
    }
}
