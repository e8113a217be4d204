//! SQLite execution for rowmap
//!
//! This crate runs the SQL text produced by `rowmap-core` on a `rusqlite` connection.

pub mod config;
pub mod connection;

pub use config::Config;
pub use connection::SqliteConnection;

use rowmap_core::{Database, Registry, Result};

/// Opens the database described by `config` and binds `registry` to it.
pub fn connect(config: &Config, registry: Registry) -> Result<Database> {
    Ok(Database::new(config.open()?, registry))
}
