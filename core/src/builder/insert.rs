use crate::builder::{QueryCore, Statement, merge_assignments, resolve_assignments};
use crate::database::Database;
use crate::error::{Result, RowmapError};
use crate::schema::Model;
use crate::values::Value;

/// Builds `INSERT` statements. Filters and joins are rejected.
#[derive(Clone, Debug)]
pub struct InsertQuery<'a> {
    core: QueryCore<'a>,
    values: Vec<(String, String)>,
}

impl<'a> InsertQuery<'a> {
    pub(crate) fn new(db: &'a Database, model: &Model) -> Self {
        Self {
            core: QueryCore::new(db, model),
            values: Vec::new(),
        }
    }

    /// Column values of the new row, keyed by field or relation name.
    pub fn values<I, K, V>(mut self, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let resolved = resolve_assignments(self.core.model(), values)?;
        merge_assignments(&mut self.values, resolved);
        Ok(self)
    }

    /// Inserts the row and returns its primary key.
    pub fn execute(&self) -> Result<i64> {
        Ok(self.raw_execute()?.last_insert_id())
    }
}

impl<'a> Statement<'a> for InsertQuery<'a> {
    const COMMITS: bool = true;

    fn core(&self) -> &QueryCore<'a> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore<'a> {
        &mut self.core
    }

    fn sql(&self) -> Result<String> {
        if self.values.is_empty() {
            return Err(RowmapError::Query(format!(
                "insert into `{}` has no values",
                self.core.model().table()
            )));
        }
        let (columns, literals): (Vec<&str>, Vec<&str>) = self
            .values
            .iter()
            .map(|(column, literal)| (column.as_str(), literal.as_str()))
            .unzip();
        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.core.model().table(),
            columns.join(","),
            literals.join(",")
        ))
    }

    fn r#where<I, K, V>(self, _lookups: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        Err(RowmapError::UnsupportedOperation(
            "insert queries do not support WHERE clauses".to_string(),
        ))
    }

    fn where_raw(self, _clause: impl Into<String>) -> Result<Self> {
        Err(RowmapError::UnsupportedOperation(
            "insert queries do not support WHERE clauses".to_string(),
        ))
    }

    fn join(self, _model: &Model) -> Result<Self> {
        Err(RowmapError::UnsupportedOperation(
            "insert queries do not support JOIN clauses".to_string(),
        ))
    }
}
