//! Database seam. The engine only needs to open a connection per system, run one query with
//! positional text parameters and read each row as a fixed number of text fields.

use rusqlite::types::ValueRef;
use rusqlite::OpenFlags;

use crate::error::ReportError;

/// Opens connections from a system's connection string. Shared by every worker.
pub trait Connector: Sync {
    type Conn: Connection;

    fn connect(&self, dsn: &str) -> Result<Self::Conn, ReportError>;
}

pub trait Connection {
    /// Runs `sql` bound with `params` in order and hands the result cursor to `visit`.
    /// Preparation and execution failures are reported as [`ReportError::Query`].
    fn query(
        &mut self,
        sql: &str,
        params: &[String],
        visit: &mut dyn FnMut(&mut dyn Rows) -> Result<(), ReportError>,
    ) -> Result<(), ReportError>;
}

/// Forward-only result cursor.
pub trait Rows {
    /// Scans the next row into `buf`, one text field per slot. Returns `Ok(false)` once the
    /// cursor is exhausted. A row whose width differs from `buf.len()` is an error.
    fn scan(&mut self, buf: &mut [String]) -> Result<bool, ReportError>;
}

/// SQLite driver. The connection string is a database path or a `file:` URI, opened read-only.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sqlite;

impl Connector for Sqlite {
    type Conn = SqliteConnection;

    fn connect(&self, dsn: &str) -> Result<SqliteConnection, ReportError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        rusqlite::Connection::open_with_flags(dsn, flags)
            .map(SqliteConnection)
            .map_err(ReportError::connection)
    }
}

pub struct SqliteConnection(rusqlite::Connection);

impl Connection for SqliteConnection {
    fn query(
        &mut self,
        sql: &str,
        params: &[String],
        visit: &mut dyn FnMut(&mut dyn Rows) -> Result<(), ReportError>,
    ) -> Result<(), ReportError> {
        let mut stmt = self.0.prepare(sql).map_err(ReportError::query)?;
        let width = stmt.column_count();
        let rows = stmt
            .query(rusqlite::params_from_iter(params))
            .map_err(ReportError::query)?;
        let mut rows = SqliteRows { rows, width };
        visit(&mut rows)
    }
}

struct SqliteRows<'stmt> {
    rows: rusqlite::Rows<'stmt>,
    width: usize,
}

impl Rows for SqliteRows<'_> {
    fn scan(&mut self, buf: &mut [String]) -> Result<bool, ReportError> {
        let row = match self.rows.next().map_err(ReportError::scan)? {
            Some(row) => row,
            None => return Ok(false),
        };
        if self.width != buf.len() {
            return Err(ReportError::ColumnCount {
                expected: buf.len(),
                actual: self.width,
            });
        }
        for (i, field) in buf.iter_mut().enumerate() {
            field.clear();
            match row.get_ref(i).map_err(ReportError::scan)? {
                ValueRef::Null => {}
                ValueRef::Integer(v) => field.push_str(&v.to_string()),
                ValueRef::Real(v) => field.push_str(&v.to_string()),
                ValueRef::Text(v) | ValueRef::Blob(v) => {
                    field.push_str(&String::from_utf8_lossy(v))
                }
            }
        }
        Ok(true)
    }
}
