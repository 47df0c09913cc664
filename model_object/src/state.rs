//! Per-instance value storage and change tracking

use crate::schema::Schema;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// Current field values of one instance plus the fields written since the
/// instance was created or last saved.
///
/// This is the raw accessor layer: it does not consult the schema, so callers
/// that accept user-supplied names check them first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelState {
    values: HashMap<String, Value>,
    dirty: BTreeSet<String>,
}

impl ModelState {
    /// State seeded with every field's declared default, nothing dirty
    pub fn from_defaults(schema: &Schema) -> Self {
        let values = schema
            .fields()
            .map(|field| (field.name().to_string(), field.default_value().clone()))
            .collect();

        Self {
            values,
            dirty: BTreeSet::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Write a value and record the field as dirty
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        self.dirty.insert(name.clone());
        self.values.insert(name, value.into());
    }

    /// Write a value loaded from the backend without marking it dirty
    pub fn load(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_field_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    /// Dirty field names, sorted
    pub fn dirty_fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.dirty.iter().map(String::as_str)
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use serde_json::json;

    fn schema() -> std::sync::Arc<Schema> {
        Schema::builder("Ttt")
            .field(FieldSpec::integer("count"))
            .field(FieldSpec::new("label").default("none"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults_are_seeded_clean() {
        let state = ModelState::from_defaults(&schema());
        assert_eq!(state.get("count"), Some(&json!(0)));
        assert_eq!(state.get("label"), Some(&json!("none")));
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_every_write_is_dirty() {
        let mut state = ModelState::from_defaults(&schema());
        state.set("label", "x");
        state.set("count", 3);

        assert_eq!(state.get("count"), Some(&json!(3)));
        assert!(state.is_field_dirty("count"));
        assert!(state.is_field_dirty("label"));
        assert_eq!(state.dirty_fields().collect::<Vec<_>>(), ["count", "label"]);

        // writing the same value still counts as a write
        state.clear_dirty();
        state.set("count", 3);
        assert!(state.is_field_dirty("count"));
    }

    #[test]
    fn test_load_does_not_mark_dirty() {
        let mut state = ModelState::from_defaults(&schema());
        state.load("count", json!(8));
        assert_eq!(state.get("count"), Some(&json!(8)));
        assert!(!state.is_dirty());
    }
}
