//! The contract with the connection that actually runs SQL text.

use std::sync::Arc;

use crate::error::Result;
use crate::schema::Schema;
use crate::values::RawValue;

/// Runs SQL text against a relational store.
///
/// Implementations own a single connection and are not expected to be shared
/// between threads; callers serialize access themselves.
pub trait Executor {
    /// Runs `sql`, committing afterwards when `commit` is set.
    fn execute(&self, sql: &str, commit: bool) -> Result<Cursor>;

    /// Issues `CREATE TABLE` for `schema`.
    fn create_table(&self, schema: &Schema) -> Result<()> {
        self.execute(&schema.create_table_sql(), true).map(drop)
    }

    /// Issues `DROP TABLE` for `schema`.
    fn drop_table(&self, schema: &Schema) -> Result<()> {
        self.execute(&schema.drop_table_sql(), true).map(drop)
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn execute(&self, sql: &str, commit: bool) -> Result<Cursor> {
        (**self).execute(sql, commit)
    }

    fn create_table(&self, schema: &Schema) -> Result<()> {
        (**self).create_table(schema)
    }

    fn drop_table(&self, schema: &Schema) -> Result<()> {
        (**self).drop_table(schema)
    }
}

/// Outcome of one executed statement: a forward-only row set plus write counters.
#[derive(Debug)]
pub struct Cursor {
    columns: Arc<[String]>,
    rows: std::vec::IntoIter<Vec<RawValue>>,
    rows_affected: usize,
    last_insert_id: i64,
}

impl Cursor {
    /// Cursor over a row set.
    pub fn rows(columns: Vec<String>, rows: Vec<Vec<RawValue>>) -> Self {
        Self {
            columns: columns.into(),
            rows: rows.into_iter(),
            rows_affected: 0,
            last_insert_id: 0,
        }
    }

    /// Cursor of a statement that returned no rows.
    pub fn written(rows_affected: usize, last_insert_id: i64) -> Self {
        Self {
            columns: Arc::from(Vec::new()),
            rows: Vec::new().into_iter(),
            rows_affected,
            last_insert_id,
        }
    }

    /// Column names of the row set, in row order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub const fn rows_affected(&self) -> usize {
        self.rows_affected
    }

    /// Primary key assigned by the most recent insert on the connection.
    pub const fn last_insert_id(&self) -> i64 {
        self.last_insert_id
    }
}

impl Iterator for Cursor {
    type Item = Vec<RawValue>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}
