//! Tracing utilities for statement and schema observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level tracing event with the SQL text and whether it commits.
///
/// ```ignore
/// rowmap_trace_query!(&sql, true);
/// ```
#[macro_export]
macro_rules! rowmap_trace_query {
    ($sql:expr, $commit:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(sql = %$sql, commit = $commit, "rowmap.query");
    };
}

/// Emit a debug-level tracing event when a model is registered.
///
/// ```ignore
/// rowmap_trace_schema!("define", schema.table());
/// ```
#[macro_export]
macro_rules! rowmap_trace_schema {
    ($event:literal, $table:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(event = $event, table = %$table, "rowmap.schema");
    };
}
