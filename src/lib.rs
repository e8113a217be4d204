//! # rowmap
//!
//! A minimal relational mapping layer: declare models, build statements through a
//! fluent chain, run them on SQLite and read rows back as records.
//!
//! ## Quick Start
//!
//! ```rust
//! use rowmap::prelude::*;
//!
//! # fn main() -> rowmap::Result<()> {
//! let mut registry = Registry::new();
//! let blog = registry.define(ModelDef::new("Blog").field("title", FieldType::char()))?;
//! let entry = registry.define(
//!     ModelDef::new("Entry")
//!         .field("title", FieldType::char_with_length(50))
//!         .field("blog", FieldType::foreign_key(&blog)),
//! )?;
//!
//! let db = rowmap::sqlite::connect(&Config::in_memory(), registry)?;
//! db.create_tables()?;
//!
//! let mut a = Record::new(&blog).with("title", "a")?;
//! a.save(&db)?;
//! Record::new(&entry).with("title", "a1")?.with("blog", &a)?.save(&db)?;
//!
//! let entries = db
//!     .select(&entry)
//!     .join(&blog)?
//!     .r#where(lookups!["title" => "a"])?
//!     .all()?;
//! assert_eq!(entries.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | Crate           | Role                                                 |
//! |-----------------|------------------------------------------------------|
//! | `rowmap-core`   | models, lookups, statement builders, records         |
//! | `rowmap-sqlite` | execution over `rusqlite`, connection configuration  |

#[macro_use]
mod macros;

/// Result type for rowmap operations
pub use rowmap_core::error::Result;

/// Error types
pub mod error {
    pub use rowmap_core::error::RowmapError;
}

pub use rowmap_core::{
    Cursor, Database, DeleteQuery, Executor, Field, FieldType, InsertQuery, Model, ModelDef,
    Operator, OrderBy, Ordering, PRIMARY_KEY, RawValue, Record, Records, Registry, Relation,
    ReverseRelation, RowmapError, Schema, SelectQuery, Statement, UpdateQuery, Value, asc, desc,
};

/// Core modules, for lower level access.
pub mod core {
    pub use rowmap_core::{builder, executor, field, join, lookup, schema, values};
}

/// SQLite execution through `rusqlite`.
#[cfg(feature = "rusqlite")]
pub mod sqlite {
    pub use rowmap_sqlite::config::{DATABASE_ENV, DEFAULT_DATABASE, FOREIGN_KEYS_ENV, IN_MEMORY};
    pub use rowmap_sqlite::{Config, SqliteConnection, connect};
}

/// Everything needed to define models and build statements.
pub mod prelude {
    pub use crate::lookups;
    pub use rowmap_core::{
        Database, FieldType, Model, ModelDef, OrderBy, Record, Registry, Statement, Value, asc,
        desc,
    };

    #[cfg(feature = "rusqlite")]
    pub use rowmap_sqlite::Config;
}
