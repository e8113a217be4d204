//! [`Executor`] over a single `rusqlite` connection.

use rowmap_core::{Cursor, Executor, RawValue, Result, RowmapError, rowmap_trace_query};
use rusqlite::Connection;
use rusqlite::config::DbConfig;
use rusqlite::types::ValueRef;

use crate::config::Config;

/// One SQLite connection running rowmap statements.
#[derive(Debug)]
pub struct SqliteConnection {
    conn: Connection,
}

impl SqliteConnection {
    /// Opens the database named by `config` and applies its settings.
    pub fn open(config: &Config) -> Result<Self> {
        let conn = if config.is_in_memory() {
            Connection::open_in_memory()
        } else {
            Connection::open(&config.path)
        }
        .map_err(RowmapError::execution)?;

        #[cfg(feature = "tracing")]
        tracing::info!(path = %config.path, foreign_keys = config.foreign_keys, "rowmap.sqlite.open");

        Self::configure(conn, config)
    }

    /// Wraps an already open connection.
    pub fn from_connection(conn: Connection, config: &Config) -> Result<Self> {
        Self::configure(conn, config)
    }

    fn configure(conn: Connection, config: &Config) -> Result<Self> {
        // Statements embed text literals in double quotes.
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DML, true)
            .map_err(RowmapError::execution)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, config.foreign_keys)
            .map_err(RowmapError::execution)?;
        Ok(Self { conn })
    }

    /// Gets a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn into_inner(self) -> Connection {
        self.conn
    }

    fn run(&self, sql: &str) -> rusqlite::Result<Cursor> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        if columns.is_empty() {
            let affected = stmt.execute([])?;
            return Ok(Cursor::written(affected, self.conn.last_insert_rowid()));
        }

        let mut rows = stmt.query([])?;
        let mut fetched = Vec::new();
        while let Some(row) = rows.next()? {
            let values = (0..columns.len())
                .map(|i| row.get_ref(i).map(raw_value))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            fetched.push(values);
        }
        Ok(Cursor::rows(columns, fetched))
    }
}

impl Executor for SqliteConnection {
    fn execute(&self, sql: &str, commit: bool) -> Result<Cursor> {
        rowmap_trace_query!(sql, commit);
        let cursor = self.run(sql).map_err(RowmapError::execution)?;
        if commit && !self.conn.is_autocommit() {
            self.conn
                .execute_batch("COMMIT")
                .map_err(RowmapError::execution)?;
        }
        Ok(cursor)
    }
}

fn raw_value(value: ValueRef<'_>) -> RawValue {
    match value {
        ValueRef::Null => RawValue::Null,
        ValueRef::Integer(i) => RawValue::Integer(i),
        ValueRef::Real(f) => RawValue::Real(f),
        ValueRef::Text(bytes) => RawValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => RawValue::Blob(bytes.to_vec()),
    }
}
