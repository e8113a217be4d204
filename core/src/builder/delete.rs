use crate::builder::{QueryCore, Statement};
use crate::database::Database;
use crate::error::{Result, RowmapError};
use crate::schema::Model;

/// Builds `DELETE` statements against a single table.
#[derive(Clone, Debug)]
pub struct DeleteQuery<'a> {
    core: QueryCore<'a>,
}

impl<'a> DeleteQuery<'a> {
    pub(crate) fn new(db: &'a Database, model: &Model) -> Self {
        Self {
            core: QueryCore::new(db, model),
        }
    }

    /// Runs the delete and returns the number of rows removed.
    pub fn execute(&self) -> Result<usize> {
        Ok(self.raw_execute()?.rows_affected())
    }
}

impl<'a> Statement<'a> for DeleteQuery<'a> {
    const COMMITS: bool = true;

    fn core(&self) -> &QueryCore<'a> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore<'a> {
        &mut self.core
    }

    fn sql(&self) -> Result<String> {
        let compiled = self.core.compile_where()?;
        let mut pieces = vec![format!("DELETE FROM {}", self.core.model().table())];
        pieces.extend(compiled.where_clause());
        Ok(pieces.join(" "))
    }

    fn join(self, _model: &Model) -> Result<Self> {
        Err(RowmapError::UnsupportedOperation(
            "delete queries do not support JOIN clauses".to_string(),
        ))
    }
}
