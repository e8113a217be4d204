//! Column types: DDL rendering and conversion between native values and SQL text.
//!
//! Every value that ends up in generated SQL passes through [`Field::to_literal`] or
//! [`Field::to_comparison_operand`]. Values are embedded as literals, never bound as
//! parameters, and text is not escaped; a placeholder based renderer would replace
//! these two methods only.

use chrono::NaiveDateTime;

use crate::lookup::Operator;
use crate::schema::Model;
use crate::values::{DATETIME_FORMAT, RawValue, Value};

/// Default maximum length of a bounded text column.
pub const DEFAULT_MAX_LENGTH: usize = 255;

/// The declared type of a column.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldType {
    /// Bounded text, truncated to `max_length` characters
    Char { max_length: usize },
    /// Unbounded text
    Text,
    /// Timestamp stored as `YYYY-MM-DD HH:MM:SS`
    DateTime,
    Integer,
    Float,
    /// Auto-generated integer key
    PrimaryKey,
    /// Reference to the primary key of another model
    ForeignKey { to: Model },
}

impl FieldType {
    pub const fn char() -> Self {
        FieldType::Char {
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    pub const fn char_with_length(max_length: usize) -> Self {
        FieldType::Char { max_length }
    }

    pub const fn text() -> Self {
        FieldType::Text
    }

    pub const fn datetime() -> Self {
        FieldType::DateTime
    }

    pub const fn integer() -> Self {
        FieldType::Integer
    }

    pub const fn float() -> Self {
        FieldType::Float
    }

    pub const fn primary_key() -> Self {
        FieldType::PrimaryKey
    }

    /// A reference to `to`, which must already be defined.
    pub fn foreign_key(to: &Model) -> Self {
        FieldType::ForeignKey { to: to.clone() }
    }

    /// SQL type keyword
    pub const fn sql_type(&self) -> &'static str {
        match self {
            FieldType::Char { .. } => "VARCHAR",
            FieldType::Text => "TEXT",
            FieldType::DateTime => "DATETIME",
            FieldType::Integer | FieldType::PrimaryKey | FieldType::ForeignKey { .. } => "INTEGER",
            FieldType::Float => "REAL",
        }
    }

    fn template(&self) -> String {
        match self {
            FieldType::Char { max_length } => format!("VARCHAR({max_length}) NOT NULL"),
            FieldType::Text | FieldType::DateTime => self.sql_type().to_string(),
            FieldType::Integer | FieldType::Float => format!("{} NOT NULL", self.sql_type()),
            FieldType::PrimaryKey => "INTEGER NOT NULL PRIMARY KEY".to_string(),
            FieldType::ForeignKey { to } => {
                format!(r#"INTEGER NOT NULL REFERENCES "{}" ("id")"#, to.table())
            }
        }
    }
}

/// Relation metadata of a foreign-key column.
#[derive(Clone, Debug, PartialEq)]
pub struct Relation {
    /// Name of the forward accessor, e.g. `blog`
    pub name: String,
    /// Name of the reverse accessor registered on the referenced model, e.g. `entry_set`
    pub related_name: String,
}

/// One registered column of a model.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    ty: FieldType,
    relation: Option<Relation>,
}

impl Field {
    /// Registers a declared attribute of the model stored in `table`.
    ///
    /// Foreign keys are stored in `<declared>_id` and expose `<table>_set` on the
    /// referenced model.
    pub(crate) fn register(declared: &str, ty: FieldType, table: &str) -> Self {
        match ty {
            FieldType::ForeignKey { .. } => Self {
                name: format!("{declared}_id"),
                ty,
                relation: Some(Relation {
                    name: declared.to_string(),
                    related_name: format!("{table}_set"),
                }),
            },
            ty => Self {
                name: declared.to_string(),
                ty,
                relation: None,
            },
        }
    }

    /// Column name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub const fn relation(&self) -> Option<&Relation> {
        self.relation.as_ref()
    }

    /// The referenced model of a foreign key.
    pub const fn references(&self) -> Option<&Model> {
        match &self.ty {
            FieldType::ForeignKey { to } => Some(to),
            _ => None,
        }
    }

    pub const fn is_primary_key(&self) -> bool {
        matches!(self.ty, FieldType::PrimaryKey)
    }

    /// Column definition used by `CREATE TABLE`.
    pub fn definition(&self) -> String {
        format!(r#""{}" {}"#, self.name, self.ty.template())
    }

    /// SQL literal for embedding `value` in a statement.
    pub fn to_literal(&self, value: &Value) -> String {
        if let Value::List(values) = value {
            return self.list_literal(values);
        }
        match &self.ty {
            FieldType::Char { max_length } => quote(&truncate(&value.to_text(), *max_length)),
            FieldType::Text => quote(&value.to_text()),
            FieldType::DateTime => match value {
                Value::Null => "NULL".to_string(),
                Value::DateTime(dt) => quote(&dt.format(DATETIME_FORMAT).to_string()),
                other => quote(&other.to_text()),
            },
            FieldType::Integer | FieldType::PrimaryKey => integer_literal(value, "0"),
            FieldType::Float => match value {
                Value::Float(f) => f.to_string(),
                Value::Integer(i) => i.to_string(),
                Value::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0).to_string(),
                _ => "0.0".to_string(),
            },
            FieldType::ForeignKey { .. } => integer_literal(value, "NULL"),
        }
    }

    /// Operand text appropriate for `op`.
    ///
    /// Pattern operators embed text unquoted inside the pattern; `in` converts each
    /// element separately and joins them with commas.
    pub fn to_comparison_operand(&self, op: Operator, value: &Value) -> String {
        match (op, value) {
            (Operator::In, Value::List(values)) => self.list_literal(values),
            (op, value) if op.is_pattern() => match &self.ty {
                FieldType::Char { max_length } => truncate(&value.to_text(), *max_length),
                FieldType::Text => value.to_text(),
                _ => self.to_literal(value),
            },
            (_, value) => self.to_literal(value),
        }
    }

    /// Native value of a cell read back from the store.
    pub fn to_native(&self, raw: &RawValue) -> Value {
        match &self.ty {
            FieldType::Char { .. } | FieldType::Text => match raw {
                RawValue::Null => Value::Text(String::new()),
                RawValue::Integer(i) => Value::Text(i.to_string()),
                RawValue::Real(f) => Value::Text(f.to_string()),
                RawValue::Text(s) => Value::Text(s.clone()),
                RawValue::Blob(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
            },
            FieldType::DateTime => match raw {
                RawValue::Text(s) => NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                    .map_or(Value::Null, Value::DateTime),
                _ => Value::Null,
            },
            FieldType::Integer | FieldType::PrimaryKey => {
                Value::Integer(integer_of(raw).unwrap_or(0))
            }
            FieldType::ForeignKey { .. } => integer_of(raw).map_or(Value::Null, Value::Integer),
            FieldType::Float => Value::Float(match raw {
                RawValue::Integer(i) => *i as f64,
                RawValue::Real(f) => *f,
                RawValue::Text(s) => s.trim().parse().unwrap_or(0.0),
                RawValue::Null | RawValue::Blob(_) => 0.0,
            }),
        }
    }

    fn list_literal(&self, values: &[Value]) -> String {
        values
            .iter()
            .map(|value| self.to_literal(value))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn quote(text: &str) -> String {
    format!("\"{text}\"")
}

fn truncate(text: &str, max_length: usize) -> String {
    text.chars().take(max_length).collect()
}

fn integer_literal(value: &Value, fallback: &str) -> String {
    match value {
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => (*f as i64).to_string(),
        Value::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_or_else(|_| fallback.to_string(), |i| i.to_string()),
        _ => fallback.to_string(),
    }
}

fn integer_of(raw: &RawValue) -> Option<i64> {
    match raw {
        RawValue::Integer(i) => Some(*i),
        RawValue::Real(f) => Some(*f as i64),
        RawValue::Text(s) => s.trim().parse().ok(),
        RawValue::Null | RawValue::Blob(_) => None,
    }
}
