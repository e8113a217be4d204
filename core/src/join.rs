//! Join clauses between adjacent models of a join path.

use std::fmt;

use crate::error::{Result, RowmapError};
use crate::schema::Model;

/// One `INNER JOIN ... AS ... ON ... = ...` clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Join {
    pub table: String,
    pub alias: String,
    /// Qualified column on the previous path element
    pub left: String,
    /// Qualified column on the joined model
    pub right: String,
}

impl Join {
    /// Connects `curr` to `prev` through whichever side owns the foreign key.
    ///
    /// A key on `prev` pointing at `curr` wins over the reverse direction.
    pub fn between(prev: &Model, prev_alias: &str, curr: &Model, curr_alias: &str) -> Result<Self> {
        let (left, right) = if let Some(fk) = prev.relation_to(curr) {
            (fk.name(), curr.primary_key().name())
        } else if let Some(fk) = prev.relation_from(curr) {
            (prev.primary_key().name(), fk.name())
        } else {
            return Err(RowmapError::JoinPathBroken {
                from: prev.name().to_string(),
                to: curr.name().to_string(),
            });
        };

        Ok(Self {
            table: curr.table().to_string(),
            alias: curr_alias.to_string(),
            left: qualify(prev_alias, left),
            right: qualify(curr_alias, right),
        })
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "INNER JOIN {} AS {} ON {} = {}",
            self.table, self.alias, self.left, self.right
        )
    }
}

/// `alias.column`, or the bare column when no alias is in effect.
pub fn qualify(alias: &str, column: &str) -> String {
    if alias.is_empty() {
        column.to_string()
    } else {
        format!("{alias}.{column}")
    }
}
