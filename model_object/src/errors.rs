use thiserror::Error;

/// Failures reported by a [`Database`](crate::traits::Database) collaborator.
///
/// The core never retries or reinterprets these; they reach the caller
/// wrapped in [`OrmError::QueryExecution`] or [`OrmError::Driver`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Database is not connected")]
    NotConnected,

    #[error("Database connection is closed")]
    Closed,

    #[error("Statement rejected: {0}")]
    Statement(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Unsupported column type '{0}'")]
    UnsupportedType(String),

    #[error("Connection lock poisoned")]
    LockPoisoned,
}

#[derive(Error, Debug)]
pub enum OrmError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Schema error in model '{model}': {message}")]
    Schema { model: String, message: String },

    #[error("Builder error on model '{model}': {message}")]
    Builder { model: String, message: String },

    #[error("Model '{model}' has no field named '{field}'")]
    UnknownField { model: String, field: String },

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("Query execution failed on model '{model}': {source}")]
    QueryExecution {
        model: String,
        sql: String,
        #[source]
        source: DriverError,
    },

    #[error("Hydration error on model '{model}': {message}")]
    Hydration { model: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl OrmError {
    pub fn schema(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            model: model.into(),
            message: message.into(),
        }
    }

    pub fn builder(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Builder {
            model: model.into(),
            message: message.into(),
        }
    }

    pub fn unknown_field(model: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            model: model.into(),
            field: field.into(),
        }
    }

    /// Wrap a collaborator failure with the model and the statement that was sent
    pub fn query_execution(model: &str, sql: &str, source: DriverError) -> Self {
        Self::QueryExecution {
            model: model.to_string(),
            sql: sql.to_string(),
            source,
        }
    }

    pub fn hydration(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Hydration {
            model: model.into(),
            message: message.into(),
        }
    }

    /// The SQL text attached to this error, if it came from an executed statement
    pub fn sql(&self) -> Option<&str> {
        match self {
            Self::QueryExecution { sql, .. } => Some(sql),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
