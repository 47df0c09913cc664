use crate::errors::OrmError;
use crate::query_builder::operation::{Operation, OperationKind, OperationState, Statement};
use crate::query_builder::sql_generation::SqlGenerator;
use crate::query_builder::values::FieldValues;
use crate::schema::Schema;
use serde_json::Value;
use std::sync::Arc;

/// `UPDATE <model> SET <col> = %s, ... [WHERE ...]`
///
/// SET values always precede WHERE values in [`values`](Self::values).
#[derive(Debug)]
pub struct UpdateQuery {
    operation: Operation,
}

impl UpdateQuery {
    pub fn new(schema: Arc<Schema>, values: impl Into<FieldValues>) -> Result<Self, OrmError> {
        let values = values.into();

        if values.is_empty() {
            return Err(OrmError::builder(
                schema.model_name(),
                "update requires at least one column value",
            ));
        }
        values.check_columns(&schema, "update", true)?;

        let sql = SqlGenerator::build_update(schema.model_name(), values.columns());
        let bound: Vec<Value> = values.values().cloned().collect();

        Ok(Self {
            operation: Operation::new(schema, OperationKind::Update, sql, bound),
        })
    }

    /// Restrict the update with `col = value` conditions joined by `AND`
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
