//! Model instances
//!
//! A [`Record`] pairs a schema with one [`ModelState`]. It is the dynamic
//! instance type; `#[model]` structs wrap one and add typed accessors.

use crate::database::Row;
use crate::errors::OrmError;
use crate::query_builder::{FieldValues, InsertQuery};
use crate::schema::Schema;
use crate::state::ModelState;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<Schema>,
    state: ModelState,
}

impl Record {
    /// A fresh instance holding every field's default
    pub fn new(schema: Arc<Schema>) -> Self {
        let state = ModelState::from_defaults(&schema);
        Self { schema, state }
    }

    /// A fresh instance with `overrides` written over the defaults.
    ///
    /// Each override goes through [`set`](Self::set) and is therefore dirty.
    pub fn with_values(
        schema: Arc<Schema>,
        overrides: impl Into<FieldValues>,
    ) -> Result<Self, OrmError> {
        let mut record = Self::new(schema);
        for (name, value) in overrides.into() {
            record.set(&name, value)?;
        }
        Ok(record)
    }

    /// Build an instance from one result row read for `columns`
    pub(crate) fn hydrate(
        schema: &Arc<Schema>,
        columns: &[String],
        row: Row,
    ) -> Result<Self, OrmError> {
        if row.len() != columns.len() {
            return Err(OrmError::hydration(
                schema.model_name(),
                format!(
                    "row has {} values but {} columns were selected",
                    row.len(),
                    columns.len()
                ),
            ));
        }

        let mut record = Self::new(Arc::clone(schema));
        for (column, value) in columns.iter().zip(row) {
            record.state.load(column.as_str(), value);
        }
        Ok(record)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Result<&Value, OrmError> {
        self.state
            .get(name)
            .filter(|_| self.schema.has_field(name))
            .ok_or_else(|| OrmError::unknown_field(self.schema.model_name(), name))
    }

    /// Read a field and deserialize it into `T`
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, OrmError> {
        let value = self.get(name)?;
        serde_json::from_value(value.clone()).map_err(|e| {
            OrmError::Serialization(format!(
                "field '{}' of model '{}': {}",
                name,
                self.schema.model_name(),
                e
            ))
        })
    }

    /// Write a field and mark it dirty
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, OrmError> {
        if !self.schema.has_field(name) {
            return Err(OrmError::unknown_field(self.schema.model_name(), name));
        }
        self.state.set(name, value);
        Ok(self)
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ModelState {
        &mut self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    pub fn dirty_fields(&self) -> Vec<String> {
        self.state.dirty_fields().map(str::to_string).collect()
    }

    /// Every field with its current value, in declaration order
    pub fn field_values(&self) -> FieldValues {
        self.schema
            .field_names()
            .iter()
            .map(|name| {
                let value = self.state.get(name).cloned().unwrap_or(Value::Null);
                (name.clone(), value)
            })
            .collect()
    }

    /// Insert the full current field mapping as a new row, then clear dirty.
    ///
    /// Always an INSERT, whether or not this instance was loaded from the
    /// backend. Dirty fields are kept when the insert fails.
    pub fn save(&mut self) -> Result<(), OrmError> {
        InsertQuery::new(Arc::clone(&self.schema), self.field_values())?.execute()?;
        self.state.clear_dirty();
        Ok(())
    }
}
