//! Record instances and the accessors that follow their foreign keys.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::builder::{SelectQuery, Statement};
use crate::database::Database;
use crate::error::{Result, RowmapError};
use crate::field::Field;
use crate::schema::{Model, PRIMARY_KEY};
use crate::values::{RawValue, Value};

/// One row of a model: field values in schema order plus any extra columns read back.
///
/// Two records are equal when they belong to the same model and share a
/// non-null primary key.
#[derive(Clone, Debug)]
pub struct Record {
    model: Model,
    values: IndexMap<String, Value>,
    related: HashMap<String, Record>,
}

impl Record {
    /// An unsaved record with every field null.
    pub fn new(model: &Model) -> Self {
        let values = model
            .fields()
            .map(|field| (field.name().to_string(), Value::Null))
            .collect();
        Self {
            model: model.clone(),
            values,
            related: HashMap::new(),
        }
    }

    pub(crate) fn from_row(model: &Model, columns: &[String], row: Vec<RawValue>) -> Self {
        let mut record = Self::new(model);
        for (column, raw) in columns.iter().zip(row) {
            let value = match model.column(column) {
                Some(field) => field.to_native(&raw),
                None => Value::from(raw),
            };
            record.values.insert(column.clone(), value);
        }
        record
    }

    pub const fn model(&self) -> &Model {
        &self.model
    }

    /// Builder form of [`Record::set`].
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Assigns a field by column or relation name.
    ///
    /// Assigning a foreign key drops the cached related record.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let field = self.model.field_by_name(name)?;
        if let Some(relation) = field.relation() {
            self.related.remove(&relation.name);
        }
        let column = field.name().to_string();
        self.values.insert(column, value.into());
        Ok(())
    }

    /// Value of a field (by column or relation name) or of an extra column.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).or_else(|| {
            self.model
                .field_by_name(name)
                .ok()
                .and_then(|field| self.values.get(field.name()))
        })
    }

    /// Primary key, once assigned.
    pub fn id(&self) -> Option<i64> {
        self.values.get(PRIMARY_KEY).and_then(Value::as_i64)
    }

    /// Column/value pairs in schema order, extra columns last.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Inserts the record, or updates it by primary key when it already has one.
    pub fn save(&mut self, db: &Database) -> Result<()> {
        let fields: Vec<(String, Value)> = self
            .model
            .fields()
            .filter(|field| !field.is_primary_key())
            .map(|field| {
                let value = self.values.get(field.name()).cloned().unwrap_or_default();
                (field.name().to_string(), value)
            })
            .collect();

        match self.id().filter(|id| *id != 0) {
            Some(id) => {
                db.update(&self.model)
                    .set(fields)?
                    .r#where([(PRIMARY_KEY, id)])?
                    .execute()?;
            }
            None => {
                let id = db.insert(&self.model).values(fields)?.execute()?;
                self.values.insert(PRIMARY_KEY.to_string(), Value::Integer(id));
            }
        }
        Ok(())
    }

    /// Follows the foreign key `name` and caches the referenced record.
    ///
    /// A null key resolves to `None`; a key that matches no row is [`RowmapError::NotFound`].
    pub fn related(&mut self, db: &Database, name: &str) -> Result<Option<&Record>> {
        let (relation, column, to) = {
            let field = self.foreign_key(name)?;
            let relation = field.relation().map_or(name, |rel| rel.name.as_str());
            let to = field.references().cloned().ok_or_else(|| {
                RowmapError::unknown_field(self.model.name(), name)
            })?;
            (relation.to_string(), field.name().to_string(), to)
        };

        if self.related.contains_key(&relation) {
            return Ok(self.related.get(&relation));
        }

        let id = self.values.get(&column).cloned().unwrap_or_default();
        if id.is_null() {
            return Ok(None);
        }

        let record = db
            .select(&to)
            .r#where([(PRIMARY_KEY, id)])?
            .first()?
            .ok_or(RowmapError::NotFound)?;
        Ok(Some(&*self.related.entry(relation).or_insert(record)))
    }

    /// Points the foreign key `name` at `record`, which must be of the referenced model.
    pub fn set_related(&mut self, name: &str, record: &Record) -> Result<()> {
        let field = self.foreign_key(name)?;
        if let Some(to) = field.references()
            && *to != record.model
        {
            return Err(RowmapError::TypeMismatch {
                expected: to.name().to_string(),
                found: record.model.name().to_string(),
            });
        }
        let relation = field
            .relation()
            .map_or_else(|| name.to_string(), |rel| rel.name.clone());
        let column = field.name().to_string();

        self.values.insert(column, Value::from(record));
        self.related.insert(relation, record.clone());
        Ok(())
    }

    /// Unexecuted select over the records whose foreign key points at this one.
    pub fn related_set<'a>(&self, db: &'a Database, name: &str) -> Result<SelectQuery<'a>> {
        let reverse = db
            .registry()
            .reverse_relation(&self.model, name)
            .ok_or_else(|| RowmapError::unknown_field(self.model.name(), name))?;
        db.select(&reverse.model)
            .r#where([(reverse.column.as_str(), Value::from(self))])
    }

    fn foreign_key(&self, name: &str) -> Result<&Field> {
        let field = self.model.field_by_name(name)?;
        match field.references() {
            Some(_) => Ok(field),
            None => Err(RowmapError::unknown_field(self.model.name(), name)),
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model && self.id().is_some() && self.id() == other.id()
    }
}

impl From<&Record> for Value {
    /// The record's primary key, for foreign-key assignments and lookups.
    fn from(record: &Record) -> Self {
        record.values.get(PRIMARY_KEY).cloned().unwrap_or_default()
    }
}
