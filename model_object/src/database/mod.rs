//! Database collaborators
//!
//! Result sets returned by [`Database::execute`](crate::traits::Database::execute),
//! driver selection from configuration, a recording mock, and the MySQL driver.

pub mod mock;
#[cfg(feature = "mysql")]
pub mod mysql;

pub use mock::{ExecutedStatement, MockDatabase, TransactionEvent};
#[cfg(feature = "mysql")]
pub use mysql::MySqlDatabase;

use crate::errors::OrmError;
use crate::traits::DatabaseHandle;
use config::DatabaseConfig;
use serde_json::Value;

/// One result row, positionally matching the statement's column list
pub type Row = Vec<Value>;

/// The outcome of one executed statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    rows: Vec<Row>,
    rows_affected: u64,
    last_insert_id: Option<u64>,
}

impl ResultSet {
    pub fn new(rows: Vec<Row>, rows_affected: u64) -> Self {
        Self {
            rows,
            rows_affected,
            last_insert_id: None,
        }
    }

    /// Result of a query: every row counts as affected
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let rows_affected = rows.len() as u64;
        Self::new(rows, rows_affected)
    }

    /// Result of a write statement that returned no rows
    pub fn affected(rows_affected: u64) -> Self {
        Self::new(Vec::new(), rows_affected)
    }

    pub fn with_last_insert_id(mut self, id: u64) -> Self {
        self.last_insert_id = Some(id);
        self
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    pub fn last_insert_id(&self) -> Option<u64> {
        self.last_insert_id
    }

    /// Take every remaining row of this result
    pub fn fetch_all(&mut self) -> Vec<Row> {
        std::mem::take(&mut self.rows)
    }
}

/// Open a connection for `config.driver`.
///
/// Fails with [`OrmError::Configuration`] when the driver is unknown or was
/// not compiled in.
pub fn connect(config: &DatabaseConfig) -> Result<DatabaseHandle, OrmError> {
    match config.driver.as_str() {
        #[cfg(feature = "mysql")]
        "mysql" => {
            let database = MySqlDatabase::new(config.clone())?;
            database.connect()?;
            Ok(std::sync::Arc::new(database))
        }
        #[cfg(not(feature = "mysql"))]
        "mysql" => Err(OrmError::Configuration(
            "the MySQL driver is not available: enable the `mysql` feature".to_string(),
        )),
        other => Err(OrmError::Configuration(format!(
            "no database driver available for '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fetch_all_drains_rows() {
        let mut result = ResultSet::from_rows(vec![vec![json!(8), json!(0)]]);
        assert_eq!(result.rows_affected(), 1);
        assert_eq!(result.fetch_all(), vec![vec![json!(8), json!(0)]]);
        assert!(result.fetch_all().is_empty());
    }

    #[test]
    fn test_unknown_driver_is_configuration_error() {
        let mut config = DatabaseConfig::new(
            "localhost".to_string(),
            3306,
            "peewee_test".to_string(),
            "root".to_string(),
            "secret".to_string(),
        );
        config.driver = "oracle".to_string();

        match connect(&config) {
            Err(OrmError::Configuration(message)) => assert!(message.contains("oracle")),
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }
}
