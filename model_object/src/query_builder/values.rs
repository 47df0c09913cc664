use crate::errors::OrmError;
use crate::schema::Schema;
use serde_json::Value;
use std::collections::HashSet;

/// An explicitly ordered list of `(column, value)` pairs.
///
/// Used for insert and update payloads and for equality conditions. Pairs are
/// compiled in the order they were added, so placeholder `i` always binds
/// value `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues {
    pairs: Vec<(String, Value)>,
}

/// Equality conditions of a WHERE clause, joined with `AND`
pub type Conditions = FieldValues;

impl FieldValues {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a pair, builder style
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.pairs.push((column.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.pairs.iter().map(|(column, value)| (column.as_str(), value))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.pairs.iter().map(|(column, _)| column.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.pairs.iter().map(|(_, value)| value)
    }

    pub(crate) fn extend(&mut self, other: FieldValues) {
        self.pairs.extend(other.pairs);
    }

    /// Every column must be declared by `schema`; with `unique`, no column may repeat
    pub(crate) fn check_columns(
        &self,
        schema: &Schema,
        context: &str,
        unique: bool,
    ) -> Result<(), OrmError> {
        let mut seen = HashSet::with_capacity(self.pairs.len());

        for column in self.columns() {
            if !schema.has_field(column) {
                return Err(OrmError::builder(
                    schema.model_name(),
                    format!("{} references undeclared column '{}'", context, column),
                ));
            }
            if unique && !seen.insert(column) {
                return Err(OrmError::builder(
                    schema.model_name(),
                    format!("{} lists column '{}' more than once", context, column),
                ));
            }
        }

        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for FieldValues
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for FieldValues
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V> From<Vec<(K, V)>> for FieldValues
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for FieldValues {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}
