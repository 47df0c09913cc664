//! Shared lifecycle of the operation builders
//!
//! An operation is compiled eagerly when constructed, may be narrowed by
//! equality conditions, and is executed at most once:
//! `Constructed -> [Filtered] -> Executed`.

use crate::database::ResultSet;
use crate::errors::OrmError;
use crate::query_builder::sql_generation::SqlGenerator;
use crate::query_builder::values::FieldValues;
use crate::schema::Schema;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Insert,
    Select,
    Update,
    Delete,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            OperationKind::Insert => "INSERT",
            OperationKind::Select => "SELECT",
            OperationKind::Update => "UPDATE",
            OperationKind::Delete => "DELETE",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Constructed,
    Filtered,
    Executed,
}

/// Compiled SQL text plus its positional values.
///
/// `values[i]` binds the i-th `%s` of `sql`, left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub values: Vec<Value>,
}

#[derive(Debug)]
pub(crate) struct Operation {
    schema: Arc<Schema>,
    kind: OperationKind,
    base_sql: String,
    base_values: Vec<Value>,
    conditions: FieldValues,
    statement: Statement,
    state: OperationState,
    result: Option<ResultSet>,
}

impl Operation {
    pub(crate) fn new(
        schema: Arc<Schema>,
        kind: OperationKind,
        sql: String,
        values: Vec<Value>,
    ) -> Self {
        crate::debug_log!("[{}] compiled: {}", kind, sql);

        Self {
            schema,
            kind,
            statement: Statement {
                sql: sql.clone(),
                values: values.clone(),
            },
            base_sql: sql,
            base_values: values,
            conditions: FieldValues::new(),
            state: OperationState::Constructed,
            result: None,
        }
    }

    pub(crate) fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub(crate) fn statement(&self) -> &Statement {
        &self.statement
    }

    pub(crate) fn state(&self) -> OperationState {
        self.state
    }

    pub(crate) fn result(&self) -> Option<&ResultSet> {
        self.result.as_ref()
    }

    pub(crate) fn take_result(&mut self) -> Option<ResultSet> {
        self.result.take()
    }

    /// Append equality conditions and recompile.
    ///
    /// Conditions accumulate across calls; the WHERE clause is rebuilt from
    /// the full list so its values always follow the base values.
    pub(crate) fn filter(&mut self, conditions: FieldValues) -> Result<(), OrmError> {
        self.ensure_not_executed("filter")?;

        if conditions.is_empty() {
            return Ok(());
        }

        conditions.check_columns(&self.schema, "where clause", false)?;
        self.conditions.extend(conditions);

        let (where_clause, where_values) = SqlGenerator::build_where_clause(&self.conditions);
        let mut values = self.base_values.clone();
        values.extend(where_values);

        self.statement = Statement {
            sql: format!("{} {}", self.base_sql, where_clause),
            values,
        };
        self.state = OperationState::Filtered;

        crate::trace_log!("[{}] filtered: {}", self.kind, self.statement.sql);
        Ok(())
    }

    /// Send the compiled statement to the bound database
    pub(crate) fn execute(&mut self) -> Result<(), OrmError> {
        self.ensure_not_executed("execute")?;

        let model = self.schema.model_name();
        let database = self.schema.require_database()?;
        let Statement { sql, values } = &self.statement;

        tracing::debug!("[{}] Table: {}", self.kind, model);
        tracing::debug!("[{}] SQL: {}", self.kind, sql);
        tracing::debug!("[{}] params count: {}", self.kind, values.len());

        let result = database.execute(sql, values).map_err(|e| {
            tracing::debug!("[{}] failed on {}: {}", self.kind, model, e);
            OrmError::query_execution(model, sql, e)
        })?;

        self.result = Some(result);
        self.state = OperationState::Executed;
        Ok(())
    }

    fn ensure_not_executed(&self, action: &str) -> Result<(), OrmError> {
        if self.state == OperationState::Executed {
            return Err(OrmError::builder(
                self.schema.model_name(),
                format!("cannot {} an operation that was already executed", action),
            ));
        }
        Ok(())
    }
}
