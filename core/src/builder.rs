//! Predicate and join accumulation shared by every statement builder.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use indexmap::IndexMap;

use crate::database::Database;
use crate::error::{Result, RowmapError};
use crate::executor::Cursor;
use crate::join::{Join, qualify};
use crate::lookup::{self, parse_key};
use crate::schema::Model;
use crate::values::Value;

pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use select::{OrderBy, Ordering, SelectQuery, asc, desc};
pub use update::UpdateQuery;

#[derive(Clone, Debug, PartialEq, Eq)]
enum PredicateKey {
    Raw,
    Column(String),
}

/// Predicates attached to one model of the join path, in insertion order.
#[derive(Clone, Debug, Default)]
struct Predicates {
    entries: Vec<(PredicateKey, String)>,
}

impl Predicates {
    fn has_raw(&self) -> bool {
        self.entries.iter().any(|(key, _)| *key == PredicateKey::Raw)
    }

    /// Stores `fragment`, replacing an earlier predicate on the same key.
    fn put(&mut self, key: PredicateKey, fragment: String) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = fragment,
            None => self.entries.push((key, fragment)),
        }
    }
}

/// Output of [`QueryCore::compile_where`].
#[derive(Clone, Debug, Default)]
pub struct CompiledWhere {
    pub joins: Vec<Join>,
    pub predicates: Vec<String>,
    aliases: IndexMap<String, String>,
}

impl CompiledWhere {
    /// Alias of `model` when aliasing is in effect.
    pub fn alias(&self, model: &Model) -> Option<&str> {
        self.aliases
            .get(model.table())
            .map(String::as_str)
            .filter(|alias| !alias.is_empty())
    }

    /// Space separated join clauses, if any.
    pub fn join_clause(&self) -> Option<String> {
        (!self.joins.is_empty()).then(|| {
            self.joins
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        })
    }

    /// `WHERE ...` with every predicate ANDed, if any.
    pub fn where_clause(&self) -> Option<String> {
        (!self.predicates.is_empty()).then(|| format!("WHERE {}", self.predicates.join(" AND ")))
    }
}

/// State shared by the four statement builders: target model, join path and predicates.
#[derive(Clone, Debug)]
pub struct QueryCore<'a> {
    db: &'a Database,
    model: Model,
    context: Model,
    joins: Vec<Model>,
    wheres: IndexMap<String, Predicates>,
}

impl<'a> QueryCore<'a> {
    pub(crate) fn new(db: &'a Database, model: &Model) -> Self {
        Self {
            db,
            model: model.clone(),
            context: model.clone(),
            joins: Vec::new(),
            wheres: IndexMap::new(),
        }
    }

    pub const fn database(&self) -> &'a Database {
        self.db
    }

    /// Root model of the statement.
    pub const fn model(&self) -> &Model {
        &self.model
    }

    /// Tip of the join path, which `where` and `order_by` target.
    pub const fn context(&self) -> &Model {
        &self.context
    }

    /// Joined models, root excluded.
    pub fn joins(&self) -> &[Model] {
        &self.joins
    }

    pub(crate) fn add_lookups<I, K, V>(&mut self, lookups: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        // Everything is resolved before anything is stored.
        let parsed = lookups
            .into_iter()
            .map(|(key, value)| {
                let (name, op) = parse_key(key.as_ref());
                let field = self.context.field_by_name(name)?;
                let fragment = lookup::fragment(field, op, &value.into());
                Ok((field.name().to_string(), fragment))
            })
            .collect::<Result<Vec<_>>>()?;

        let predicates = self
            .wheres
            .entry(self.context.table().to_string())
            .or_default();
        for (column, fragment) in parsed {
            predicates.put(PredicateKey::Column(column), fragment);
        }
        Ok(())
    }

    pub(crate) fn add_raw(&mut self, clause: String) -> Result<()> {
        let table = self.context.table();
        if self.wheres.get(table).is_some_and(Predicates::has_raw) {
            return Err(RowmapError::DuplicateRawPredicate {
                model: self.context.name().to_string(),
            });
        }
        self.wheres
            .entry(table.to_string())
            .or_default()
            .put(PredicateKey::Raw, clause);
        Ok(())
    }

    pub(crate) fn join(&mut self, model: &Model) -> Result<()> {
        if self.model == *model || self.joins.contains(model) {
            return Err(RowmapError::UnsupportedOperation(format!(
                "`{}` already appears in the join path",
                model.name()
            )));
        }
        if !self.context.has_relation_with(model) {
            return Err(RowmapError::NoRelationFound {
                from: self.context.name().to_string(),
                to: model.name().to_string(),
            });
        }
        self.joins.push(model.clone());
        self.context = model.clone();
        Ok(())
    }

    /// Resolves aliases, join clauses and predicates across the join path.
    ///
    /// The root joins the path whenever there are joins or predicates. Aliases
    /// `t1, t2, ...` are assigned in path order only when something is joined.
    pub fn compile_where(&self) -> Result<CompiledWhere> {
        let mut path: Vec<&Model> = Vec::with_capacity(self.joins.len() + 1);
        if !self.wheres.is_empty() || !self.joins.is_empty() {
            path.push(&self.model);
            path.extend(self.joins.iter());
        }
        let aliased = !self.joins.is_empty();

        let mut compiled = CompiledWhere::default();
        let mut prev_alias = String::new();

        for (i, model) in path.iter().enumerate() {
            let alias = if aliased {
                format!("t{}", i + 1)
            } else {
                String::new()
            };
            compiled
                .aliases
                .insert(model.table().to_string(), alias.clone());

            if let Some(predicates) = self.wheres.get(model.table()) {
                for (key, fragment) in &predicates.entries {
                    let predicate = match key {
                        PredicateKey::Raw => fragment.clone(),
                        PredicateKey::Column(column) => {
                            format!("{} {fragment}", qualify(&alias, column))
                        }
                    };
                    compiled.predicates.push(predicate);
                }
            }

            if i > 0 {
                let prev = path[i - 1];
                compiled
                    .joins
                    .push(Join::between(prev, &prev_alias, model, &alias)?);
            }
            prev_alias = alias;
        }

        Ok(compiled)
    }
}

/// Resolves `(field, value)` assignments to `(column, literal)` pairs against `model`.
pub(crate) fn resolve_assignments<I, K, V>(model: &Model, assignments: I) -> Result<Vec<(String, String)>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Value>,
{
    assignments
        .into_iter()
        .map(|(key, value)| {
            let field = model.field_by_name(key.as_ref())?;
            Ok((field.name().to_string(), field.to_literal(&value.into())))
        })
        .collect()
}

/// Replaces assignments to an already assigned column, otherwise appends.
pub(crate) fn merge_assignments(target: &mut Vec<(String, String)>, incoming: Vec<(String, String)>) {
    for (column, literal) in incoming {
        match target.iter_mut().find(|(existing, _)| *existing == column) {
            Some(entry) => entry.1 = literal,
            None => target.push((column, literal)),
        }
    }
}

/// Behaviour shared by SELECT, INSERT, UPDATE and DELETE builders.
///
/// Every builder compiles to SQL text and hands it to the database's
/// [`Executor`](crate::Executor); only reads skip the commit.
pub trait Statement<'a>: Sized {
    /// Whether executing the statement commits.
    const COMMITS: bool;

    #[doc(hidden)]
    fn core(&self) -> &QueryCore<'a>;

    #[doc(hidden)]
    fn core_mut(&mut self) -> &mut QueryCore<'a>;

    /// Compiles the statement to SQL text.
    fn sql(&self) -> Result<String>;

    /// Adds keyed predicates (`field` or `field__op`) to the tip of the join path.
    fn r#where<I, K, V>(mut self, lookups: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.core_mut().add_lookups(lookups)?;
        Ok(self)
    }

    /// Adds a raw predicate to the tip of the join path; one per model.
    fn where_raw(mut self, clause: impl Into<String>) -> Result<Self> {
        self.core_mut().add_raw(clause.into())?;
        Ok(self)
    }

    /// Extends the join path to `model` and makes it the tip.
    ///
    /// Each model appears at most once in a path; joining it again fails with
    /// [`RowmapError::UnsupportedOperation`].
    fn join(mut self, model: &Model) -> Result<Self> {
        self.core_mut().join(model)?;
        Ok(self)
    }

    /// Compiles and hands the statement to the executor.
    fn raw_execute(&self) -> Result<Cursor> {
        let sql = self.sql()?;
        self.core().database().executor().execute(&sql, Self::COMMITS)
    }
}
