use crate::errors::OrmError;
use serde::Serialize;
use serde_json::Value;

/// Convert a typed field value into its stored form.
///
/// Types that do not serialize to JSON (maps with non-string keys, for one)
/// are rejected with [`OrmError::Serialization`].
pub fn to_field_value<T: Serialize>(value: T) -> Result<Value, OrmError> {
    Ok(serde_json::to_value(value)?)
}

/// Like [`to_field_value`] for a field whose Rust type cannot hold `NULL`.
///
/// Values that serialize to `Null` anyway (NaN and infinite floats) would not
/// read back as `T`, so they are rejected.
pub fn to_required_field_value<T: Serialize>(field: &str, value: T) -> Result<Value, OrmError> {
    match to_field_value(value)? {
        Value::Null => Err(OrmError::Serialization(format!(
            "field '{}' cannot store NULL",
            field
        ))),
        value => Ok(value),
    }
}

/// Static properties of one column.
///
/// Nullability, uniqueness and the primary-key flag are metadata only; the
/// backend is the one that enforces them.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    nullable: bool,
    indexed: bool,
    unique: bool,
    default: Value,
    invalid_default: Option<String>,
    primary_key: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: true,
            indexed: false,
            unique: false,
            default: Value::Null,
            invalid_default: None,
            primary_key: false,
        }
    }

    /// Integer column defaulting to `0`
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name).default(0)
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self.invalid_default = None;
        self
    }

    /// Default taken from a typed Rust value. A value that cannot be stored
    /// is reported when the schema is built.
    pub fn default_of<T: Serialize>(self, value: T) -> Self {
        let converted = to_field_value(value);
        self.typed_default(converted)
    }

    /// [`default_of`](Self::default_of) for a Rust type that cannot hold `NULL`
    pub fn required_default_of<T: Serialize>(self, value: T) -> Self {
        let converted = to_required_field_value(&self.name, value);
        self.typed_default(converted)
    }

    fn typed_default(mut self, converted: Result<Value, OrmError>) -> Self {
        match converted {
            Ok(value) => {
                self.default = value;
                self.invalid_default = None;
            }
            Err(e) => {
                self.default = Value::Null;
                self.invalid_default = Some(e.to_string());
            }
        }
        self
    }

    pub fn primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Why the typed default could not be stored, if it could not
    pub fn invalid_default(&self) -> Option<&str> {
        self.invalid_default.as_deref()
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }
}
