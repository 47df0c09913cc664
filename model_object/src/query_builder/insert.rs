use crate::errors::OrmError;
use crate::query_builder::operation::{Operation, OperationKind, OperationState, Statement};
use crate::query_builder::sql_generation::SqlGenerator;
use crate::query_builder::values::FieldValues;
use crate::schema::Schema;
use serde_json::Value;
use std::sync::Arc;

/// `INSERT INTO <model> (<cols>) VALUES (<placeholders>)`
///
/// Columns are written in payload order.
#[derive(Debug)]
pub struct InsertQuery {
    operation: Operation,
}

impl InsertQuery {
    pub fn new(schema: Arc<Schema>, values: impl Into<FieldValues>) -> Result<Self, OrmError> {
        let values = values.into();

        if values.is_empty() {
            return Err(OrmError::builder(
                schema.model_name(),
                "insert requires at least one column value",
            ));
        }
        values.check_columns(&schema, "insert", true)?;

        let sql = SqlGenerator::build_insert(schema.model_name(), values.columns());
        let bound: Vec<Value> = values.values().cloned().collect();

        Ok(Self {
            operation: Operation::new(schema, OperationKind::Insert, sql, bound),
        })
    }

    pub fn execute(mut self) -> Result<Self, OrmError> {
        self.operation.execute()?;
        Ok(self)
    }

    pub fn sql(&self) -> &str {
        &self.operation.statement().sql
    }

    pub fn values(&self) -> &[Value] {
        &self.operation.statement().values
    }

    pub fn statement(&self) -> &Statement {
        self.operation.statement()
    }

    pub fn state(&self) -> OperationState {
        self.operation.state()
    }

    pub fn rows_affected(&self) -> Option<u64> {
        self.operation.result().map(|result| result.rows_affected())
    }

    /// Auto-increment id reported by the backend, if any
    pub fn last_insert_id(&self) -> Option<u64> {
        self.operation.result().and_then(|result| result.last_insert_id())
    }
}
