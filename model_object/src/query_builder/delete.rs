use crate::errors::OrmError;
use crate::query_builder::operation::{Operation, OperationKind, OperationState, Statement};
use crate::query_builder::sql_generation::SqlGenerator;
use crate::query_builder::values::FieldValues;
use crate::schema::Schema;
use serde_json::Value;
use std::sync::Arc;

/// `DELETE FROM <model> [WHERE ...]`
#[derive(Debug)]
pub struct DeleteQuery {
    operation: Operation,
}

impl DeleteQuery {
    pub fn new(schema: Arc<Schema>) -> Self {
        let sql = SqlGenerator::build_delete(schema.model_name());
        Self {
            operation: Operation::new(schema, OperationKind::Delete, sql, Vec::new()),
        }
    }

    /// Restrict the delete with `col = value` conditions joined by `AND`
    pub fn filter(mut self, conditions: impl Into<FieldValues>) -> Result<Self, OrmError> {
        self.operation.filter(conditions.into())?;
        Ok(self)
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
}
