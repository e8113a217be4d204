use crate::builder::{QueryCore, Statement};
use crate::database::Database;
use crate::error::{Result, RowmapError};
use crate::join::qualify;
use crate::record::Record;
use crate::results::Records;
use crate::schema::Model;
use crate::values::{RawValue, Value};

const ALL_COLUMNS: &str = "*";

/// Sort direction for ORDER BY clauses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderBy {
    #[default]
    Asc,
    Desc,
}

impl OrderBy {
    pub const fn as_sql(self) -> &'static str {
        match self {
            OrderBy::Asc => "ASC",
            OrderBy::Desc => "DESC",
        }
    }
}

/// A field (or any expression valid against the tip model) with a direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ordering {
    pub field: String,
    pub direction: OrderBy,
}

impl From<&str> for Ordering {
    fn from(field: &str) -> Self {
        Self::from(field.to_string())
    }
}

impl From<String> for Ordering {
    fn from(field: String) -> Self {
        Self {
            field,
            direction: OrderBy::Asc,
        }
    }
}

impl<S: Into<String>> From<(S, OrderBy)> for Ordering {
    fn from((field, direction): (S, OrderBy)) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Ascending ordering on `field`.
pub fn asc(field: impl Into<String>) -> Ordering {
    (field, OrderBy::Asc).into()
}

/// Descending ordering on `field`.
pub fn desc(field: impl Into<String>) -> Ordering {
    (field, OrderBy::Desc).into()
}

/// Builds `SELECT` statements and materializes their rows as [`Record`]s.
#[derive(Clone, Debug)]
pub struct SelectQuery<'a> {
    core: QueryCore<'a>,
    projection: String,
    group_by: Vec<String>,
    having: Vec<String>,
    order_by: Vec<(Model, String)>,
    pagination: Option<(i64, u64)>,
}

impl<'a> SelectQuery<'a> {
    pub(crate) fn new(db: &'a Database, model: &Model) -> Self {
        Self {
            core: QueryCore::new(db, model),
            projection: ALL_COLUMNS.to_string(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            pagination: None,
        }
    }

    /// Replaces the projection; `*` is qualified with the root alias when joins exist.
    pub fn projection(mut self, projection: impl Into<String>) -> Self {
        self.projection = projection.into();
        self
    }

    /// Appends a GROUP BY expression. Expressions are comma separated.
    pub fn group_by(mut self, clause: impl Into<String>) -> Self {
        self.group_by.push(clause.into());
        self
    }

    /// Appends a HAVING condition. Conditions are ANDed.
    pub fn having(mut self, clause: impl Into<String>) -> Self {
        self.having.push(clause.into());
        self
    }

    /// Orders by fields of the current join-path tip.
    pub fn order_by<I, O>(mut self, orderings: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Ordering>,
    {
        for ordering in orderings {
            let Ordering { field, direction } = ordering.into();
            self.order_by.push((
                self.core.context().clone(),
                format!("{field} {}", direction.as_sql()),
            ));
        }
        self
    }

    /// One-based page of `size` rows; pages below one clamp to the first page.
    ///
    /// Compiling fails with [`RowmapError::Query`] when the offset does not fit in an `i64`.
    pub fn paginate(mut self, page: i64, size: u64) -> Self {
        self.pagination = Some((page, size));
        self
    }

    /// Number of rows the statement matches, ignoring pagination.
    pub fn count(&self) -> Result<i64> {
        let mut counting = self.clone();
        counting.pagination = None;
        let pk = self.core.model().primary_key().name();
        let column = if self.core.joins().is_empty() {
            pk.to_string()
        } else {
            qualify("t1", pk)
        };
        counting.projection = format!("COUNT({column})");

        let row = counting.raw_execute()?.next().ok_or(RowmapError::NotFound)?;
        match row.into_iter().next() {
            Some(RawValue::Integer(count)) => Ok(count),
            Some(raw) => Value::from(raw)
                .as_i64()
                .ok_or_else(|| RowmapError::Query("COUNT returned a non-integer".to_string())),
            None => Err(RowmapError::NotFound),
        }
    }

    /// Runs the statement; rows are converted as the iterator is consumed.
    pub fn execute(&self) -> Result<Records> {
        Ok(Records::new(self.core.model(), self.raw_execute()?))
    }

    pub fn all(&self) -> Result<Vec<Record>> {
        Ok(self.execute()?.collect())
    }

    pub fn first(&self) -> Result<Option<Record>> {
        Ok(self.execute()?.next())
    }
}

impl<'a> Statement<'a> for SelectQuery<'a> {
    const COMMITS: bool = false;

    fn core(&self) -> &QueryCore<'a> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore<'a> {
        &mut self.core
    }

    fn sql(&self) -> Result<String> {
        let compiled = self.core.compile_where()?;
        let model = self.core.model();

        let (table, projection) = match compiled.alias(model) {
            Some(alias) => {
                let projection = if self.projection == ALL_COLUMNS {
                    format!("{alias}.{ALL_COLUMNS}")
                } else {
                    self.projection.clone()
                };
                (format!("{} AS {alias}", model.table()), projection)
            }
            None => (model.table().to_string(), self.projection.clone()),
        };

        let mut pieces = vec![format!("SELECT {projection} FROM {table}")];
        pieces.extend(compiled.join_clause());
        pieces.extend(compiled.where_clause());
        if !self.group_by.is_empty() {
            pieces.push(format!("GROUP BY {}", self.group_by.join(", ")));
        }
        if !self.having.is_empty() {
            pieces.push(format!("HAVING {}", self.having.join(" AND ")));
        }
        if !self.order_by.is_empty() {
            let order_by = self
                .order_by
                .iter()
                .map(|(context, clause)| match compiled.alias(context) {
                    Some(alias) => format!("{alias}.{clause}"),
                    None => clause.clone(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            pieces.push(format!("ORDER BY {order_by}"));
        }
        if let Some((page, size)) = self.pagination {
            let offset = i64::try_from(size)
                .ok()
                .and_then(|size| (page.max(1) - 1).checked_mul(size))
                .ok_or_else(|| {
                    RowmapError::Query(format!("page {page} of size {size} is out of range"))
                })?;
            pieces.push(format!("LIMIT {size} OFFSET {offset}"));
        }

        Ok(pieces.join(" "))
    }
}
