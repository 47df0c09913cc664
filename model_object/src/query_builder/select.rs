use crate::errors::OrmError;
use crate::query_builder::operation::{Operation, OperationKind, OperationState, Statement};
use crate::query_builder::sql_generation::SqlGenerator;
use crate::query_builder::values::FieldValues;
use crate::record::Record;
use crate::schema::Schema;
use crate::traits::Model;
use serde_json::Value;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

/// `SELECT <cols> FROM <model> [WHERE ...]`, hydrating rows into `M`
#[derive(Debug)]
pub struct SelectQuery<M: Model> {
    operation: Operation,
    columns: Vec<String>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> SelectQuery<M> {
    /// Select `columns`, or every declared field in declaration order when empty
    pub fn new<I, S>(schema: Arc<Schema>, columns: I) -> Result<Self, OrmError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        if columns.is_empty() {
            columns = schema.field_names().to_vec();
        } else {
            let mut seen = HashSet::with_capacity(columns.len());
            for column in &columns {
                if !schema.has_field(column) {
                    return Err(OrmError::builder(
                        schema.model_name(),
                        format!("select references undeclared column '{}'", column),
                    ));
                }
                if !seen.insert(column.as_str()) {
                    return Err(OrmError::builder(
                        schema.model_name(),
                        format!("select lists column '{}' more than once", column),
                    ));
                }
            }
        }

        let sql = SqlGenerator::build_select(schema.model_name(), &columns);

        Ok(Self {
            operation: Operation::new(schema, OperationKind::Select, sql, Vec::new()),
            columns,
            _model: PhantomData,
        })
    }

    /// Restrict the query with `col = value` conditions joined by `AND`
    pub fn filter(mut self, conditions: impl Into<FieldValues>) -> Result<Self, OrmError> {
        self.operation.filter(conditions.into())?;
        Ok(self)
    }

    pub fn execute(mut self) -> Result<Self, OrmError> {
        self.operation.execute()?;
        Ok(self)
    }

    /// Hydrate the rows produced by the executed statement, in row order.
    ///
    /// Each row fills the requested columns positionally; fields outside the
    /// column list keep their declared defaults.
    pub fn get(mut self) -> Result<Vec<M>, OrmError> {
        let schema = Arc::clone(self.operation.schema());
        let mut result = self.operation.take_result().ok_or_else(|| {
            OrmError::builder(
                schema.model_name(),
                "select must be executed before its rows can be read",
            )
        })?;

        result
            .fetch_all()
            .into_iter()
            .map(|row| Record::hydrate(&schema, &self.columns, row).map(M::from_record))
            .collect()
    }

    /// Columns in the order rows are read
    pub fn columns(&self) -> &[String] {
        &self.columns
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
}
