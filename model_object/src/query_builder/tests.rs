//! Builder tests
//!
//! SQL text, value alignment and lifecycle of the operation builders.

#[cfg(test)]
mod tests {
    use crate::database::{MockDatabase, ResultSet};
    use crate::errors::{DriverError, OrmError};
    use crate::query_builder::{FieldValues, OperationState, SqlGenerator};
    use crate::record::Record;
    use crate::schema::{FieldSpec, Schema};
    use crate::table::Table;
    use crate::traits::DatabaseHandle;
    use serde_json::json;
    use std::sync::Arc;

    fn ttt_table(db: &Arc<MockDatabase>) -> Table<Record> {
        let handle: DatabaseHandle = db.clone();
        let schema = Schema::builder("Ttt")
            .field(FieldSpec::integer("count"))
            .field(FieldSpec::integer("num"))
            .database(handle)
            .build()
            .unwrap();
        Table::from_schema(schema)
    }

    fn unbound_table() -> Table<Record> {
        let schema = Schema::builder("Ttt")
            .field(FieldSpec::integer("count"))
            .field(FieldSpec::integer("num"))
            .build()
            .unwrap();
        Table::from_schema(schema)
    }

    fn assert_aligned(sql: &str, values: &[serde_json::Value]) {
        assert_eq!(
            SqlGenerator::placeholder_count(sql),
            values.len(),
            "placeholders and values diverge in: {}",
            sql
        );
    }

    // ========================================
    // Insert
    // ========================================

    #[test]
    fn test_insert_keeps_payload_order() {
        let table = unbound_table();

        let insert = table.insert([("count", 1), ("num", 2)]).unwrap();
        assert_eq!(insert.sql(), "INSERT INTO Ttt (count, num) VALUES (%s, %s)");
        assert_eq!(insert.values(), [json!(1), json!(2)]);

        let reversed = table.insert([("num", 2), ("count", 1)]).unwrap();
        assert_eq!(reversed.sql(), "INSERT INTO Ttt (num, count) VALUES (%s, %s)");
        assert_eq!(reversed.values(), [json!(2), json!(1)]);
    }

    #[test]
    fn test_insert_mixed_value_types() {
        let table = unbound_table();
        let insert = table
            .insert(FieldValues::new().with("count", 3).with("num", json!(null)))
            .unwrap();

        assert_eq!(insert.values(), [json!(3), json!(null)]);
        assert_aligned(insert.sql(), insert.values());
    }

    #[test]
    fn test_insert_rejects_bad_payloads() {
        let table = unbound_table();

        assert!(matches!(
            table.insert(FieldValues::new()),
            Err(OrmError::Builder { .. })
        ));
        assert!(matches!(
            table.insert([("missing", 1)]),
            Err(OrmError::Builder { .. })
        ));
        assert!(matches!(
            table.insert([("count", 1), ("count", 2)]),
            Err(OrmError::Builder { .. })
        ));
    }

    #[test]
    fn test_insert_execute_reports_result() {
        let db = Arc::new(MockDatabase::new());
        db.push_result(ResultSet::affected(1).with_last_insert_id(42));
        let table = ttt_table(&db);

        let insert = table.insert([("count", 8)]).unwrap().execute().unwrap();
        assert_eq!(insert.state(), OperationState::Executed);
        assert_eq!(insert.rows_affected(), Some(1));
        assert_eq!(insert.last_insert_id(), Some(42));

        let statement = db.last_statement().unwrap();
        assert_eq!(statement.sql, "INSERT INTO Ttt (count) VALUES (%s)");
        assert_eq!(statement.values, vec![json!(8)]);
    }

    // ========================================
    // Select
    // ========================================

    #[test]
    fn test_select_defaults_to_declared_fields() {
        let table = unbound_table();

        let select = table.select_all().unwrap();
        assert_eq!(select.sql(), "SELECT count, num FROM Ttt");
        assert!(select.values().is_empty());

        let select = table.select(Vec::<String>::new()).unwrap();
        assert_eq!(select.sql(), "SELECT count, num FROM Ttt");
        assert_eq!(select.columns(), ["count", "num"]);
    }

    #[test]
    fn test_select_with_columns_and_where() {
        let table = unbound_table();
        let select = table
            .select(["num", "count"])
            .unwrap()
            .filter([("count", 8)])
            .unwrap();

        assert_eq!(select.sql(), "SELECT num, count FROM Ttt WHERE count = %s");
        assert_eq!(select.values(), [json!(8)]);
        assert_eq!(select.state(), OperationState::Filtered);
    }

    #[test]
    fn test_select_rejects_unknown_and_duplicate_columns() {
        let table = unbound_table();
        assert!(matches!(
            table.select(["count", "missing"]),
            Err(OrmError::Builder { .. })
        ));
        assert!(matches!(
            table.select(["count", "count"]),
            Err(OrmError::Builder { .. })
        ));
    }

    #[test]
    fn test_select_hydrates_rows_in_order() {
        let db = Arc::new(MockDatabase::new());
        db.push_rows(vec![vec![json!(8), json!(0)], vec![json!(7), json!(1)]]);
        let table = ttt_table(&db);

        let rows = table
            .select(["count", "num"])
            .unwrap()
            .execute()
            .unwrap()
            .get()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("count").unwrap(), &json!(8));
        assert_eq!(rows[0].get("num").unwrap(), &json!(0));
        assert_eq!(rows[1].get("count").unwrap(), &json!(7));
        assert_eq!(rows[1].get("num").unwrap(), &json!(1));
        assert!(rows.iter().all(|row| !row.is_dirty()));
    }

    #[test]
    fn test_hydration_reads_only_the_executed_statement() {
        let db = Arc::new(MockDatabase::new());
        // the filtered statement returns one row; a second, unrelated result stays queued
        db.push_rows(vec![vec![json!(8)]]);
        db.push_rows(vec![vec![json!(8)], vec![json!(7)]]);
        let table = ttt_table(&db);

        let rows = table
            .select(["count"])
            .unwrap()
            .filter([("count", 8)])
            .unwrap()
            .execute()
            .unwrap()
            .get()
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(db.statements().len(), 1);
        assert_eq!(
            db.last_statement().unwrap().sql,
            "SELECT count FROM Ttt WHERE count = %s"
        );
    }

    #[test]
    fn test_partial_select_keeps_defaults_for_other_fields() {
        let db = Arc::new(MockDatabase::new());
        db.push_rows(vec![vec![json!(5)]]);
        let table = ttt_table(&db);

        let rows = table.select(["num"]).unwrap().execute().unwrap().get().unwrap();
        assert_eq!(rows[0].get("num").unwrap(), &json!(5));
        assert_eq!(rows[0].get("count").unwrap(), &json!(0));
    }

    #[test]
    fn test_get_before_execute_is_rejected() {
        let table = unbound_table();
        let select = table.select_all().unwrap();
        assert!(matches!(select.get(), Err(OrmError::Builder { .. })));
    }

    #[test]
    fn test_row_width_mismatch() {
        let db = Arc::new(MockDatabase::new());
        db.push_rows(vec![vec![json!(8)]]);
        let table = ttt_table(&db);

        let result = table.select_all().unwrap().execute().unwrap().get();
        assert!(matches!(result, Err(OrmError::Hydration { .. })));
    }

    // ========================================
    // Update
    // ========================================

    #[test]
    fn test_update_set_values_precede_where_values() {
        let table = unbound_table();
        let update = table
            .update([("count", 0)])
            .unwrap()
            .filter([("count", 8)])
            .unwrap();

        assert_eq!(update.sql(), "UPDATE Ttt SET count = %s WHERE count = %s");
        assert_eq!(update.values(), [json!(0), json!(8)]);
    }

    #[test]
    fn test_update_multiple_assignments_and_conditions() {
        let table = unbound_table();
        let update = table
            .update([("count", 0), ("num", 9)])
            .unwrap()
            .filter([("count", 8), ("num", 0)])
            .unwrap();

        assert_eq!(
            update.sql(),
            "UPDATE Ttt SET count = %s, num = %s WHERE count = %s AND num = %s"
        );
        assert_eq!(update.values(), [json!(0), json!(9), json!(8), json!(0)]);
        assert_aligned(update.sql(), update.values());
    }

    #[test]
    fn test_update_rejects_empty_payload() {
        let table = unbound_table();
        assert!(matches!(
            table.update(FieldValues::new()),
            Err(OrmError::Builder { .. })
        ));
    }

    #[test]
    fn test_update_execute_reports_rows_affected() {
        let db = Arc::new(MockDatabase::new());
        db.push_result(ResultSet::affected(3));
        let table = ttt_table(&db);

        let update = table.update([("num", 1)]).unwrap();
        assert_eq!(update.rows_affected(), None);
        let update = update.execute().unwrap();
        assert_eq!(update.rows_affected(), Some(3));
    }

    // ========================================
    // Delete
    // ========================================

    #[test]
    fn test_delete_minimal_sql() {
        let table = unbound_table();
        let delete = table.delete();
        assert_eq!(delete.sql(), "DELETE FROM Ttt");
        assert!(delete.values().is_empty());
        assert_eq!(delete.state(), OperationState::Constructed);
    }

    #[test]
    fn test_delete_with_where() {
        let table = unbound_table();
        let delete = table.delete().filter([("count", 7)]).unwrap();
        assert_eq!(delete.sql(), "DELETE FROM Ttt WHERE count = %s");
        assert_eq!(delete.values(), [json!(7)]);
    }

    // ========================================
    // WHERE edge cases
    // ========================================

    #[test]
    fn test_empty_where_is_a_no_op() {
        let table = unbound_table();

        let select = table.select_all().unwrap().filter(FieldValues::new()).unwrap();
        assert_eq!(select.sql(), "SELECT count, num FROM Ttt");
        assert_eq!(select.state(), OperationState::Constructed);

        let update = table
            .update([("count", 1)])
            .unwrap()
            .filter(FieldValues::new())
            .unwrap();
        assert_eq!(update.sql(), "UPDATE Ttt SET count = %s");
        assert_eq!(update.values(), [json!(1)]);

        let delete = table.delete().filter(FieldValues::new()).unwrap();
        assert_eq!(delete.sql(), "DELETE FROM Ttt");
    }

    #[test]
    fn test_repeated_where_accumulates_conditions() {
        let table = unbound_table();
        let update = table
            .update([("num", 9)])
            .unwrap()
            .filter([("count", 8)])
            .unwrap()
            .filter([("num", 0)])
            .unwrap();

        assert_eq!(
            update.sql(),
            "UPDATE Ttt SET num = %s WHERE count = %s AND num = %s"
        );
        assert_eq!(update.values(), [json!(9), json!(8), json!(0)]);
        assert_aligned(update.sql(), update.values());
    }

    #[test]
    fn test_where_rejects_unknown_column() {
        let table = unbound_table();
        assert!(matches!(
            table.delete().filter([("missing", 1)]),
            Err(OrmError::Builder { .. })
        ));
    }

    #[test]
    fn test_sql_generation_empty_conditions() {
        let (where_clause, values) = SqlGenerator::build_where_clause(&FieldValues::new());
        assert_eq!(where_clause, "");
        assert!(values.is_empty());
    }

    #[test]
    fn test_values_are_never_interpolated() {
        let table = unbound_table();
        let select = table
            .select_all()
            .unwrap()
            .filter([("count", "'; DROP TABLE Ttt; --")])
            .unwrap();

        assert_eq!(select.sql(), "SELECT count, num FROM Ttt WHERE count = %s");
        assert_eq!(select.values(), [json!("'; DROP TABLE Ttt; --")]);
    }

    // ========================================
    // Lifecycle
    // ========================================

    #[test]
    fn test_executed_operation_is_single_use() {
        let db = Arc::new(MockDatabase::new());
        let table = ttt_table(&db);

        let delete = table.delete().execute().unwrap();
        assert!(matches!(
            delete.filter([("count", 1)]),
            Err(OrmError::Builder { .. })
        ));

        let delete = table.delete().execute().unwrap();
        assert!(matches!(delete.execute(), Err(OrmError::Builder { .. })));
        assert_eq!(db.statements().len(), 2);
    }

    #[test]
    fn test_execute_without_database() {
        let table = unbound_table();
        assert!(matches!(
            table.delete().execute(),
            Err(OrmError::Configuration(_))
        ));
    }

    #[test]
    fn test_driver_error_is_propagated_with_context() {
        let db = Arc::new(MockDatabase::new());
        db.push_error(DriverError::Statement("syntax error".to_string()));
        let table = ttt_table(&db);

        match table.delete().filter([("count", 7)]).unwrap().execute() {
            Err(OrmError::QueryExecution { model, sql, source }) => {
                assert_eq!(model, "Ttt");
                assert_eq!(sql, "DELETE FROM Ttt WHERE count = %s");
                assert_eq!(source, DriverError::Statement("syntax error".to_string()));
            }
            other => panic!("Expected query execution error, got {:?}", other),
        }
    }

    #[test]
    fn test_placeholder_alignment_across_builders() {
        let table = unbound_table();
        let conditions = FieldValues::from(vec![("count", 1), ("num", 2)]);

        let insert = table.insert([("count", 1), ("num", 2)]).unwrap();
        let select = table.select_all().unwrap().filter(conditions.clone()).unwrap();
        let update = table
            .update([("num", 3)])
            .unwrap()
            .filter(conditions.clone())
            .unwrap();
        let delete = table.delete().filter(conditions).unwrap();

        assert_aligned(insert.sql(), insert.values());
        assert_aligned(select.sql(), select.values());
        assert_aligned(update.sql(), update.values());
        assert_aligned(delete.sql(), delete.values());
    }
}
