//! Core Rowhaus functionality
//!
//! This module contains the main Rowhaus struct: one database handle shared by
//! every model registered with it.

use std::collections::HashMap;
use std::sync::Arc;

use model_object::{DatabaseHandle, DeclaredModel, Record, Schema, SchemaBuilder, Table};

use crate::errors::RowhausError;
use config::{AppConfig, DatabaseConfig};

/// Main Rowhaus coordinator that owns the database handle and the bound model schemas
#[derive(Debug)]
pub struct Rowhaus {
    database: DatabaseHandle,
    models: HashMap<String, Arc<Schema>>,
}

impl Rowhaus {
    /// Open a connection with the driver named by `config`
    pub fn connect(config: &DatabaseConfig) -> Result<Self, RowhausError> {
        let database = model_object::connect(config)?;
        tracing::info!(
            "Rowhaus connected to {} database '{}' at {}:{}",
            config.driver,
            config.database,
            config.host,
            config.port
        );
        Ok(Self::with_database(database))
    }

    /// Load configuration from `.env` / `rowhaus.toml`, then connect
    pub fn from_env() -> Result<Self, RowhausError> {
        let config = AppConfig::load()?;
        Self::connect(&config.database)
    }

    /// Use an existing database handle, such as a `MockDatabase`
    pub fn with_database(database: DatabaseHandle) -> Self {
        Self {
            database,
            models: HashMap::new(),
        }
    }

    /// Get the shared database handle
    pub fn database(&self) -> &DatabaseHandle {
        &self.database
    }

    /// Declare `M`, bind it to this coordinator's database and register it by table name
    pub fn register<M: DeclaredModel>(&mut self) -> Result<Table<M>, RowhausError> {
        let name = M::table_name();
        if self.models.contains_key(name) {
            return Err(RowhausError::ModelAlreadyRegistered(name.to_string()));
        }

        let table = M::bind(Arc::clone(&self.database))?;
        self.models
            .insert(name.to_string(), Arc::clone(table.schema()));

        crate::debug_log!("[ROWHAUS] registered model {}", name);
        Ok(table)
    }

    /// Register a model declared at runtime; its instances are plain [`Record`]s
    pub fn register_schema(&mut self, builder: SchemaBuilder) -> Result<Table<Record>, RowhausError> {
        let schema = builder.database(Arc::clone(&self.database)).build()?;
        let name = schema.model_name().to_string();
        if self.models.contains_key(&name) {
            return Err(RowhausError::ModelAlreadyRegistered(name));
        }

        self.models.insert(name, Arc::clone(&schema));
        Ok(Table::from_schema(schema))
    }

    /// Get the table handle of a registered model
    pub fn table<M: DeclaredModel>(&self) -> Result<Table<M>, RowhausError> {
        self.schema(M::table_name()).map(Table::from_schema)
    }

    /// Get the table handle of any registered model by name, working on plain records
    pub fn records(&self, name: &str) -> Result<Table<Record>, RowhausError> {
        self.schema(name).map(Table::from_schema)
    }

    fn schema(&self, name: &str) -> Result<Arc<Schema>, RowhausError> {
        self.models
            .get(name)
            .cloned()
            .ok_or_else(|| RowhausError::ModelNotFound(name.to_string()))
    }

    /// List all registered model names, sorted
    pub fn list_models(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Remove a model by name. Table handles already handed out keep working.
    pub fn unregister(&mut self, name: &str) -> Result<(), RowhausError> {
        self.models
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| RowhausError::ModelNotFound(name.to_string()))
    }

    /// Check database connection health
    pub fn health_check(&self) -> Result<(), RowhausError> {
        self.database.execute("SELECT 1", &[])?;
        Ok(())
    }

    pub fn begin(&self) -> Result<(), RowhausError> {
        Ok(self.database.begin()?)
    }

    pub fn commit(&self) -> Result<(), RowhausError> {
        Ok(self.database.commit()?)
    }

    pub fn rollback(&self) -> Result<(), RowhausError> {
        Ok(self.database.rollback()?)
    }

    /// Close the shared connection; every bound model stops executing
    pub fn close(self) -> Result<(), RowhausError> {
        self.database.close()?;
        tracing::info!("Rowhaus connection closed");
        Ok(())
    }
}
