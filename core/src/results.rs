//! Lazy conversion of cursor rows into records.

use crate::executor::Cursor;
use crate::record::Record;
use crate::schema::Model;

/// Forward-only sequence of [`Record`]s over one executed statement.
///
/// Each row becomes a record of the target model when it is pulled. Columns the
/// model declares are converted by their field; any other column (an aggregate
/// alias, say) is kept as read. Iterating again requires executing again.
#[derive(Debug)]
pub struct Records {
    model: Model,
    cursor: Cursor,
}

impl Records {
    pub fn new(model: &Model, cursor: Cursor) -> Self {
        Self {
            model: model.clone(),
            cursor,
        }
    }

    pub fn columns(&self) -> &[String] {
        self.cursor.columns()
    }
}

impl Iterator for Records {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        let row = self.cursor.next()?;
        Some(Record::from_row(&self.model, self.cursor.columns(), row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}
