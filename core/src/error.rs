use thiserror::Error;

#[derive(Debug, Error)]
pub enum RowmapError {
    /// A lookup, assignment or accessor names a field the model does not have
    #[error("Unknown field `{field}` on model `{model}`")]
    UnknownField { model: String, field: String },

    /// `join` was asked to connect two models without a foreign key between them
    #[error("No foreign key found between `{from}` and `{to}`")]
    NoRelationFound { from: String, to: String },

    /// Two adjacent models in a join path have no foreign key between them
    #[error("Join path is broken between `{from}` and `{to}`")]
    JoinPathBroken { from: String, to: String },

    /// A raw WHERE clause was already attached to this model
    #[error("A raw WHERE clause has already been specified for `{model}`")]
    DuplicateRawPredicate { model: String },

    /// The statement kind does not support the requested clause
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A related record of the wrong model was assigned
    #[error("Cannot assign a `{found}` record where a `{expected}` record is expected")]
    TypeMismatch { expected: String, found: String },

    /// No rows returned when at least one was expected
    #[error("No rows found")]
    NotFound,

    /// Invalid model definition
    #[error("Schema error: {0}")]
    Schema(String),

    /// Statement cannot be compiled
    #[error("Query error: {0}")]
    Query(String),

    /// Failure reported by the execution collaborator, passed through untouched
    #[error("Execution error: {0}")]
    Execution(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl RowmapError {
    /// Wraps a collaborator error without altering it.
    pub fn execution<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Execution(Box::new(error))
    }

    pub(crate) fn unknown_field(model: &str, field: &str) -> Self {
        Self::UnknownField {
            model: model.to_string(),
            field: field.to_string(),
        }
    }
}

/// Result type for database operations
pub type Result<T> = std::result::Result<T, RowmapError>;
