use crate::builder::{QueryCore, Statement, merge_assignments, resolve_assignments};
use crate::database::Database;
use crate::error::{Result, RowmapError};
use crate::schema::Model;
use crate::values::Value;

/// Builds `UPDATE` statements against a single table.
#[derive(Clone, Debug)]
pub struct UpdateQuery<'a> {
    core: QueryCore<'a>,
    assignments: Vec<(String, String)>,
}

impl<'a> UpdateQuery<'a> {
    pub(crate) fn new(db: &'a Database, model: &Model) -> Self {
        Self {
            core: QueryCore::new(db, model),
            assignments: Vec::new(),
        }
    }

    pub fn set<I, K, V>(mut self, assignments: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let resolved = resolve_assignments(self.core.model(), assignments)?;
        merge_assignments(&mut self.assignments, resolved);
        Ok(self)
    }

    /// Runs the update and returns the number of rows changed.
    pub fn execute(&self) -> Result<usize> {
        Ok(self.raw_execute()?.rows_affected())
    }
}

impl<'a> Statement<'a> for UpdateQuery<'a> {
    const COMMITS: bool = true;

    fn core(&self) -> &QueryCore<'a> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore<'a> {
        &mut self.core
    }

    fn sql(&self) -> Result<String> {
        if self.assignments.is_empty() {
            return Err(RowmapError::Query(format!(
                "update of `{}` has no assignments",
                self.core.model().table()
            )));
        }
        let compiled = self.core.compile_where()?;
        let set = self
            .assignments
            .iter()
            .map(|(column, literal)| format!("{column}={literal}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut pieces = vec![format!("UPDATE {} SET {set}", self.core.model().table())];
        pieces.extend(compiled.where_clause());
        Ok(pieces.join(" "))
    }

    fn join(self, _model: &Model) -> Result<Self> {
        Err(RowmapError::UnsupportedOperation(
            "update queries do not support JOIN clauses".to_string(),
        ))
    }
}
