//! Dialect independent half of rowmap: models, lookups, statement builders and records.
//!
//! Statements compile to plain SQL text and run through an [`Executor`]; the
//! `rowmap-sqlite` crate provides one over `rusqlite`.

pub mod builder;
pub mod database;
pub mod error;
pub mod executor;
pub mod field;
pub mod join;
pub mod lookup;
pub mod record;
pub mod results;
pub mod schema;
pub mod tracing;
pub mod values;

// Re-export key types and traits
pub use builder::{
    DeleteQuery, InsertQuery, OrderBy, Ordering, SelectQuery, Statement, UpdateQuery, asc, desc,
};
pub use database::Database;
pub use error::{Result, RowmapError};
pub use executor::{Cursor, Executor};
pub use field::{Field, FieldType, Relation};
pub use lookup::Operator;
pub use record::Record;
pub use results::Records;
pub use schema::{Model, ModelDef, PRIMARY_KEY, Registry, ReverseRelation, Schema};
pub use values::{RawValue, Value};
