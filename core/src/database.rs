use std::fmt;

use crate::builder::{DeleteQuery, InsertQuery, SelectQuery, Statement, UpdateQuery};
use crate::error::{Result, RowmapError};
use crate::executor::Executor;
use crate::record::Record;
use crate::rowmap_trace_schema;
use crate::schema::{Model, Registry};
use crate::values::Value;

/// Database instance that pairs one connection with the models defined for it.
pub struct Database {
    conn: Box<dyn Executor>,
    registry: Registry,
}

impl Database {
    pub fn new(conn: impl Executor + 'static, registry: Registry) -> Self {
        Self {
            conn: Box::new(conn),
            registry,
        }
    }

    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Gets a reference to the underlying connection
    pub fn executor(&self) -> &dyn Executor {
        self.conn.as_ref()
    }

    /// Looks a registered model up by declared or table name.
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.registry.model(name)
    }

    /// Creates a SELECT query builder.
    pub fn select(&self, model: &Model) -> SelectQuery<'_> {
        SelectQuery::new(self, model)
    }

    /// Creates an INSERT query builder.
    pub fn insert(&self, model: &Model) -> InsertQuery<'_> {
        InsertQuery::new(self, model)
    }

    /// Creates an UPDATE query builder.
    pub fn update(&self, model: &Model) -> UpdateQuery<'_> {
        UpdateQuery::new(self, model)
    }

    /// Creates a DELETE query builder.
    pub fn delete(&self, model: &Model) -> DeleteQuery<'_> {
        DeleteQuery::new(self, model)
    }

    /// First record matching `lookups`, or [`RowmapError::NotFound`].
    pub fn get<I, K, V>(&self, model: &Model, lookups: I) -> Result<Record>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.select(model)
            .r#where(lookups)?
            .first()?
            .ok_or(RowmapError::NotFound)
    }

    pub fn create_table(&self, model: &Model) -> Result<()> {
        rowmap_trace_schema!("create_table", model.table());
        self.conn.create_table(model)
    }

    pub fn drop_table(&self, model: &Model) -> Result<()> {
        rowmap_trace_schema!("drop_table", model.table());
        self.conn.drop_table(model)
    }

    /// Creates every registered table, in definition order.
    pub fn create_tables(&self) -> Result<()> {
        self.registry
            .models()
            .try_for_each(|model| self.create_table(model))
    }

    /// Drops every registered table, referencing tables first.
    pub fn drop_tables(&self) -> Result<()> {
        self.registry
            .models()
            .rev()
            .try_for_each(|model| self.drop_table(model))
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
