//! Convenience re-exports for common model-object usage

// Core traits
pub use crate::traits::{Database, DatabaseHandle, DeclaredModel, Model};

// Error types
pub use crate::errors::{DriverError, OrmError};

// Declaration and instances
pub use crate::record::Record;
pub use crate::schema::{FieldSpec, Schema, SchemaBuilder};
pub use crate::table::Table;

// Query building
pub use crate::query_builder::{
    Conditions, DeleteQuery, FieldValues, InsertQuery, SelectQuery, UpdateQuery,
};

// Collaborators
pub use crate::database::{connect, MockDatabase, ResultSet};
#[cfg(feature = "mysql")]
pub use crate::database::MySqlDatabase;

// Common external dependencies that are frequently used
pub use serde_json::{json, Value};
