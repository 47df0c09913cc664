//! SQL text assembly
//!
//! Identifiers come from validated schemas and are written verbatim; every
//! value becomes a positional `%s` placeholder.

use crate::query_builder::values::FieldValues;
use serde_json::Value;

/// Positional placeholder of the target dialect
pub const PLACEHOLDER: &str = "%s";

pub struct SqlGenerator;

impl SqlGenerator {
    /// `INSERT INTO <table> (<cols>) VALUES (<placeholders>)`
    pub fn build_insert<'a>(table: &str, columns: impl IntoIterator<Item = &'a str>) -> String {
        let columns: Vec<&str> = columns.into_iter().collect();
        let placeholders = vec![PLACEHOLDER; columns.len()];

        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        )
    }

    /// `SELECT <cols> FROM <table>`
    pub fn build_select(table: &str, columns: &[String]) -> String {
        format!("SELECT {} FROM {}", columns.join(", "), table)
    }

    /// `UPDATE <table> SET <col> = %s, ...`
    pub fn build_update<'a>(table: &str, columns: impl IntoIterator<Item = &'a str>) -> String {
        let assignments: Vec<String> = columns
            .into_iter()
            .map(|column| format!("{} = {}", column, PLACEHOLDER))
            .collect();

        format!("UPDATE {} SET {}", table, assignments.join(", "))
    }

    /// `DELETE FROM <table>`
    pub fn build_delete(table: &str) -> String {
        format!("DELETE FROM {}", table)
    }

    /// Build a `WHERE` clause from equality conditions.
    ///
    /// Returns an empty clause and no values when there are no conditions.
    pub fn build_where_clause(conditions: &FieldValues) -> (String, Vec<Value>) {
        if conditions.is_empty() {
            return (String::new(), Vec::new());
        }

        let mut values = Vec::with_capacity(conditions.len());
        let conditions_sql = conditions
            .iter()
            .map(|(column, value)| {
                values.push(value.clone());
                format!("{} = {}", column, PLACEHOLDER)
            })
            .collect::<Vec<_>>()
            .join(" AND ");

        (format!("WHERE {}", conditions_sql), values)
    }

    pub fn placeholder_count(sql: &str) -> usize {
        sql.matches(PLACEHOLDER).count()
    }
}
