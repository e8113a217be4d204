//! Where the database lives and how its connection is set up.

use rowmap_core::Result;

use crate::connection::SqliteConnection;

/// Environment variable naming the database file.
pub const DATABASE_ENV: &str = "ROWMAP_DATABASE";

/// Environment variable enabling foreign-key enforcement (`1`, `true` or `on`).
pub const FOREIGN_KEYS_ENV: &str = "ROWMAP_FOREIGN_KEYS";

/// Database file used when none is configured.
pub const DEFAULT_DATABASE: &str = "rowmap.db";

/// Path that opens a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Connection settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Database file, or [`IN_MEMORY`]
    pub path: String,
    /// Enforce `REFERENCES` constraints
    pub foreign_keys: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE)
    }
}

impl Config {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            foreign_keys: false,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY)
    }

    /// Reads [`DATABASE_ENV`] and [`FOREIGN_KEYS_ENV`], falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = lookup(DATABASE_ENV)
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let foreign_keys = lookup(FOREIGN_KEYS_ENV).is_some_and(|flag| {
            matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "on")
        });
        Self { path, foreign_keys }
    }

    pub fn with_foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY
    }

    /// Opens a connection with these settings.
    pub fn open(&self) -> Result<SqliteConnection> {
        SqliteConnection::open(self)
    }
}
