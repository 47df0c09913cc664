use crate::database::ResultSet;
use crate::errors::DriverError;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// The relational backend, treated as a black box.
///
/// Every call blocks the calling thread until the backend answers. One handle
/// wraps one logical connection shared by every model bound to it; callers
/// that share a handle across threads must serialize their statement
/// sequences themselves. Transaction boundaries are never opened or closed
/// implicitly by the builders.
pub trait Database: Send + Sync + Debug {
    /// Run one statement. `values[i]` binds the i-th `%s` placeholder.
    ///
    /// The returned [`ResultSet`] carries exactly the rows this statement
    /// produced.
    fn execute(&self, sql: &str, values: &[Value]) -> Result<ResultSet, DriverError>;

    fn begin(&self) -> Result<(), DriverError>;

    fn commit(&self) -> Result<(), DriverError>;

    fn rollback(&self) -> Result<(), DriverError>;

    /// Release the underlying connection
    fn close(&self) -> Result<(), DriverError>;
}

/// Shared reference to a database collaborator
pub type DatabaseHandle = Arc<dyn Database>;
