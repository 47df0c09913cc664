//! Model Object - schema reflection and query building core for Rowhaus
//!
//! Models are declared as an ordered list of [`FieldSpec`]s, instances track
//! which fields were written since the last save, and CRUD intents compile
//! into SQL text with positional `%s` values executed through a [`Database`].

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod database;
pub mod errors;
pub mod prelude;
pub mod query_builder;
pub mod record;
pub mod schema;
pub mod state;
pub mod table;
pub mod traits;
pub mod validation;

pub use database::{connect, MockDatabase, ResultSet, Row};
pub use errors::{DriverError, OrmError};
pub use query_builder::{
    Conditions, DeleteQuery, FieldValues, InsertQuery, SelectQuery, Statement, UpdateQuery,
};
pub use record::Record;
pub use schema::{to_field_value, to_required_field_value, FieldSpec, Schema, SchemaBuilder};
pub use state::ModelState;
pub use table::Table;
pub use traits::{Database, DatabaseHandle, DeclaredModel, Model};
pub use validation::{ValidatedFieldName, ValidatedTableName, ValidationError};

#[cfg(feature = "mysql")]
pub use database::MySqlDatabase;

pub use serde_json::Value;
