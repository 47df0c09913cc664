//! Per-model entry points
//!
//! A [`Table`] is the handle through which a model's CRUD operations are
//! started. It owns a shared reference to the model's schema, and through it
//! the bound database.

use crate::errors::OrmError;
use crate::query_builder::{DeleteQuery, FieldValues, InsertQuery, SelectQuery, UpdateQuery};
use crate::record::Record;
use crate::schema::Schema;
use crate::traits::{DatabaseHandle, DeclaredModel, Model};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

pub struct Table<M: Model> {
    schema: Arc<Schema>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Clone for Table<M> {
    fn clone(&self) -> Self {
        Self::from_schema(Arc::clone(&self.schema))
    }
}

impl<M: Model> fmt::Debug for Table<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("model", &self.schema.model_name())
            .field("fields", &self.schema.field_names())
            .field("bound", &self.schema.database().is_some())
            .finish()
    }
}

impl<M: DeclaredModel> Table<M> {
    /// Declare `M` and bind it to `database`
    pub fn bind(database: DatabaseHandle) -> Result<Self, OrmError> {
        Ok(Self::from_schema(M::schema_builder().database(database).build()?))
    }

    /// Declare `M` without a database; statements compile but cannot execute
    pub fn unbound() -> Result<Self, OrmError> {
        Ok(Self::from_schema(M::schema_builder().build()?))
    }
}

impl<M: Model> Table<M> {
    pub fn from_schema(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            _model: PhantomData,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn name(&self) -> &str {
        self.schema.model_name()
    }

    /// A new instance holding every field's default
    pub fn instance(&self) -> M {
        M::from_record(Record::new(Arc::clone(&self.schema)))
    }

    /// A new instance with `overrides` applied over the defaults, each marked dirty
    pub fn create(&self, overrides: impl Into<FieldValues>) -> Result<M, OrmError> {
        Record::with_values(Arc::clone(&self.schema), overrides).map(M::from_record)
    }

    pub fn insert(&self, values: impl Into<FieldValues>) -> Result<InsertQuery, OrmError> {
        InsertQuery::new(Arc::clone(&self.schema), values)
    }

    /// Select `columns`; an empty list selects every field
    pub fn select<I, S>(&self, columns: I) -> Result<SelectQuery<M>, OrmError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectQuery::new(Arc::clone(&self.schema), columns)
    }

    /// Select every field in declaration order
    pub fn select_all(&self) -> Result<SelectQuery<M>, OrmError> {
        SelectQuery::new(Arc::clone(&self.schema), Vec::<String>::new())
    }

    pub fn update(&self, values: impl Into<FieldValues>) -> Result<UpdateQuery, OrmError> {
        UpdateQuery::new(Arc::clone(&self.schema), values)
    }

    pub fn delete(&self) -> DeleteQuery {
        DeleteQuery::new(Arc::clone(&self.schema))
    }
}
