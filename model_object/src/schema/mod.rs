//! Model schemas
//!
//! A [`Schema`] is built once per model from an explicit, ordered list of
//! [`FieldSpec`]s and is immutable afterwards. Declaration order is kept: it is
//! the column order of full-row selects and of `save()` inserts.

pub mod field;

pub use field::{to_field_value, to_required_field_value, FieldSpec};

use crate::errors::OrmError;
use crate::traits::DatabaseHandle;
use crate::validation::{ValidatedFieldName, ValidatedTableName};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
pub struct Schema {
    model_name: String,
    field_names: Vec<String>,
    fields: HashMap<String, FieldSpec>,
    database: Option<DatabaseHandle>,
    options: HashMap<String, Value>,
}

impl Schema {
    pub fn builder(model_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(model_name)
    }

    /// Model name, also used verbatim as the table name
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Field specs in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> + '_ {
        self.field_names
            .iter()
            .filter_map(move |name| self.fields.get(name))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn primary_key(&self) -> Option<&FieldSpec> {
        self.fields().find(|field| field.is_primary_key())
    }

    pub fn database(&self) -> Option<&DatabaseHandle> {
        self.database.as_ref()
    }

    /// The bound database, or a configuration error naming this model
    pub fn require_database(&self) -> Result<&DatabaseHandle, OrmError> {
        self.database.as_ref().ok_or_else(|| {
            OrmError::Configuration(format!(
                "model '{}' is not bound to a database",
                self.model_name
            ))
        })
    }

    /// A configuration value merged in at declaration time
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// A copy of this schema bound to `database`
    pub fn rebind(&self, database: DatabaseHandle) -> Arc<Schema> {
        Arc::new(Schema {
            model_name: self.model_name.clone(),
            field_names: self.field_names.clone(),
            fields: self.fields.clone(),
            database: Some(database),
            options: self.options.clone(),
        })
    }
}

/// Explicit registration step producing an immutable [`Schema`]
#[derive(Debug)]
pub struct SchemaBuilder {
    model_name: String,
    fields: Vec<FieldSpec>,
    database: Option<DatabaseHandle>,
    options: Vec<(String, Value)>,
}

impl SchemaBuilder {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            fields: Vec::new(),
            database: None,
            options: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Bind every statement of this model to `database`
    pub fn database(mut self, database: DatabaseHandle) -> Self {
        self.database = Some(database);
        self
    }

    /// Merge one configuration entry. Keys starting with `_` are private and skipped.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !key.starts_with('_') {
            self.options.push((key, value.into()));
        }
        self
    }

    pub fn build(self) -> Result<Arc<Schema>, OrmError> {
        let model = self.model_name;

        ValidatedTableName::new(&model)
            .map_err(|e| OrmError::schema(&model, format!("invalid model name: {}", e)))?;

        if self.fields.is_empty() {
            return Err(OrmError::schema(&model, "a model must declare at least one field"));
        }

        let mut field_names = Vec::with_capacity(self.fields.len());
        let mut fields = HashMap::with_capacity(self.fields.len());
        let mut primary_key: Option<String> = None;

        for field in self.fields {
            let name = field.name().to_string();

            ValidatedFieldName::new(&name)
                .map_err(|e| OrmError::schema(&model, format!("invalid field name: {}", e)))?;

            if let Some(reason) = field.invalid_default() {
                return Err(OrmError::schema(
                    &model,
                    format!("invalid default for field '{}': {}", name, reason),
                ));
            }

            if fields.contains_key(&name) {
                return Err(OrmError::schema(
                    &model,
                    format!("field '{}' is declared more than once", name),
                ));
            }

            if field.is_primary_key() {
                if let Some(existing) = &primary_key {
                    return Err(OrmError::schema(
                        &model,
                        format!(
                            "fields '{}' and '{}' are both marked as primary key",
                            existing, name
                        ),
                    ));
                }
                primary_key = Some(name.clone());
            }

            field_names.push(name.clone());
            fields.insert(name, field);
        }

        crate::debug_log!(
            "[SCHEMA] Model: {}, fields: {}",
            model,
            field_names.join(", ")
        );

        Ok(Arc::new(Schema {
            model_name: model,
            field_names,
            fields,
            database: self.database,
            options: self.options.into_iter().collect(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MockDatabase;
    use serde_json::json;

    fn ttt() -> SchemaBuilder {
        Schema::builder("Ttt")
            .field(FieldSpec::integer("count"))
            .field(FieldSpec::integer("num"))
    }

    #[test]
    fn test_field_order_is_declaration_order() {
        let schema = Schema::builder("Ttt")
            .field(FieldSpec::integer("zeta"))
            .field(FieldSpec::integer("alpha"))
            .field(FieldSpec::integer("mid"))
            .build()
            .unwrap();

        assert_eq!(schema.field_names(), ["zeta", "alpha", "mid"]);
        let names: Vec<&str> = schema.fields().map(|f| f.name()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let err = ttt().field(FieldSpec::new("count")).build().unwrap_err();
        match err {
            OrmError::Schema { model, message } => {
                assert_eq!(model, "Ttt");
                assert!(message.contains("'count'"));
            }
            other => panic!("Expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_identifiers_are_rejected() {
        assert!(matches!(
            Schema::builder("bad-name")
                .field(FieldSpec::integer("count"))
                .build(),
            Err(OrmError::Schema { .. })
        ));
        assert!(matches!(
            Schema::builder("Ttt").field(FieldSpec::new("where")).build(),
            Err(OrmError::Schema { .. })
        ));
    }

    #[test]
    fn test_empty_model_is_rejected() {
        assert!(matches!(
            Schema::builder("Ttt").build(),
            Err(OrmError::Schema { .. })
        ));
    }

    #[test]
    fn test_unstorable_default_is_rejected() {
        let err = Schema::builder("Meas")
            .field(FieldSpec::new("reading").required_default_of(f64::NAN))
            .build()
            .unwrap_err();
        match err {
            OrmError::Schema { model, message } => {
                assert_eq!(model, "Meas");
                assert!(message.contains("'reading'"));
            }
            other => panic!("Expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_single_primary_key() {
        let schema = Schema::builder("Ttt")
            .field(FieldSpec::integer("id").primary_key(true))
            .field(FieldSpec::integer("count"))
            .build()
            .unwrap();
        assert_eq!(schema.primary_key().map(|f| f.name()), Some("id"));

        let err = Schema::builder("Ttt")
            .field(FieldSpec::integer("id").primary_key(true))
            .field(FieldSpec::integer("other_id").primary_key(true))
            .build();
        assert!(matches!(err, Err(OrmError::Schema { .. })));
    }

    #[test]
    fn test_options_skip_private_keys() {
        let schema = ttt()
            .option("charset", "utf8")
            .option("_internal", true)
            .build()
            .unwrap();

        assert_eq!(schema.option("charset"), Some(&json!("utf8")));
        assert_eq!(schema.option("_internal"), None);
    }

    #[test]
    fn test_database_binding() {
        let unbound = ttt().build().unwrap();
        assert!(unbound.database().is_none());
        assert!(matches!(
            unbound.require_database(),
            Err(OrmError::Configuration(_))
        ));

        let db: DatabaseHandle = Arc::new(MockDatabase::new());
        let bound = unbound.rebind(db);
        assert!(bound.require_database().is_ok());
        assert_eq!(bound.field_names(), unbound.field_names());
    }
}
