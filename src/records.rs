//! JSON record I/O for task tables.
//!
//! Tables travel as an array of flat objects, one per row, the shape a
//! spreadsheet export or a data-frame `to_json(orient="records")` produces:
//!
//! ```json
//! [
//!   {"id": "T1", "hours": 16, "available": "06/01/2025", "dev": null},
//!   {"id": "T2", "hours": "7,5", "available": "2025-01-07"}
//! ]
//! ```
//!
//! Columns are the union of all keys in first-appearance order; a key
//! missing from a row reads as an empty cell. On output, dates are written
//! as `YYYY-MM-DD` strings and empty cells as `null`.
//!
//! This is the only way a serialized table enters the crate: every value
//! goes through [`Cell::from_text`] / [`Cell::from_number`] and every row
//! through [`TaskTable::push_row`].

use serde_json::{Map, Number, Value};

use crate::error::PlanError;
use crate::models::{Cell, TaskTable};

/// One table row as a JSON object.
pub type Record = Map<String, Value>;

/// Builds a table from JSON records.
pub fn from_records(records: &[Record]) -> TaskTable {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    let mut table = TaskTable::new(columns.iter().map(String::as_str));
    for record in records {
        let row: Vec<Cell> = columns
            .iter()
            .map(|c| record.get(c).map_or(Cell::Empty, cell_from_value))
            .collect();
        table.push_row(row);
    }
    table
}

/// Converts a table into JSON records, one per row.
pub fn to_records(table: &TaskTable) -> Vec<Record> {
    table
        .rows()
        .map(|row| {
            table
                .columns()
                .iter()
                .zip(row)
                .map(|(name, cell)| (name.clone(), value_from_cell(cell)))
                .collect()
        })
        .collect()
}

/// Parses a JSON array of records into a table.
///
/// # Errors
///
/// Returns [`PlanError::ParseJson`] if the text is not an array of objects.
pub fn from_json_str(json: &str) -> Result<TaskTable, PlanError> {
    let records: Vec<Record> = serde_json::from_str(json)?;
    Ok(from_records(&records))
}

/// Serializes a table as a pretty-printed JSON array of records.
///
/// # Errors
///
/// Returns [`PlanError::ParseJson`] if serialization fails.
pub fn to_json_string(table: &TaskTable) -> Result<String, PlanError> {
    Ok(serde_json::to_string_pretty(&to_records(table))?)
}

fn cell_from_value(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Empty,
        Value::String(s) => Cell::from_text(s),
        Value::Number(n) => n.as_f64().map_or(Cell::Empty, Cell::from_number),
        Value::Bool(b) => Cell::Text(b.to_string()),
        // Nested values are kept verbatim as text.
        other => Cell::Text(other.to_string()),
    }
}

fn value_from_cell(cell: &Cell) -> Value {
    match cell {
        Cell::Empty => Value::Null,
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Number(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
        Cell::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnMap, Resource, ResourcePool, WorkingCalendar};
    use crate::scheduler::{AssignmentEngine, SkipReason, TaskState};
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_column_union_in_first_seen_order() {
        let table = from_json_str(
            r#"[
                {"id": "T1", "hours": 16},
                {"id": "T2", "group": "GRID", "hours": 8}
            ]"#,
        )
        .unwrap();
        assert_eq!(table.columns(), ["id", "hours", "group"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, "group"), Some(&Cell::Empty));
        assert_eq!(table.get(1, "group"), Some(&Cell::from("GRID")));
    }

    #[test]
    fn test_value_normalization() {
        let table = from_json_str(
            r#"[{"a": null, "b": "nan", "c": " None ", "d": 7.5, "e": true, "f": "28/07/2025"}]"#,
        )
        .unwrap();
        assert!(table.get(0, "a").unwrap().is_empty());
        assert!(table.get(0, "b").unwrap().is_empty());
        assert!(table.get(0, "c").unwrap().is_empty());
        assert_eq!(table.get(0, "d"), Some(&Cell::Number(7.5)));
        assert_eq!(table.get(0, "e"), Some(&Cell::Text("true".into())));
        assert_eq!(
            table.get(0, "f").unwrap().as_date(),
            NaiveDate::from_ymd_opt(2025, 7, 28)
        );
    }

    #[test]
    fn test_output_shape() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let table = TaskTable::new(["dev", "hours", "start", "note"]).with_row([
            Cell::from("Alice"),
            Cell::Number(16.0),
            Cell::Date(date),
            Cell::Empty,
        ]);
        let records = to_records(&table);
        assert_eq!(
            Value::Object(records[0].clone()),
            json!({"dev": "Alice", "hours": 16.0, "start": "2025-01-06", "note": null})
        );
        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys, ["dev", "hours", "start", "note"]);
    }

    fn engine() -> AssignmentEngine {
        let columns = ColumnMap::new("dev", "hours", "available", "plan", "start", "end");
        let pool = ResourcePool::flat(vec![Resource::new("Alice")]);
        AssignmentEngine::new(columns, pool, WorkingCalendar::default())
    }

    #[test]
    fn test_sentinel_resource_is_unassigned() {
        let table = from_json_str(
            r#"[{"hours": 8, "available": "2025-01-06", "dev": "None"}]"#,
        )
        .unwrap();
        assert!(table.get(0, "dev").unwrap().is_empty());

        let out = engine().assign(&table).unwrap();
        assert_eq!(out.states, vec![TaskState::NewlyAssigned]);
        assert_eq!(out.table.get(0, "dev"), Some(&Cell::from("Alice")));
    }

    #[test]
    fn test_ragged_records_stay_aligned() {
        // The first record lacks every column after `hours`.
        let table = from_json_str(
            r#"[
                {"hours": 8},
                {"hours": 16, "available": "2025-01-08", "dev": null}
            ]"#,
        )
        .unwrap();
        assert!(table.rows().all(|r| r.len() == table.columns().len()));

        let out = engine().assign(&table).unwrap();
        assert_eq!(
            out.states,
            vec![
                TaskState::Skipped(SkipReason::MissingBaseDate),
                TaskState::NewlyAssigned,
            ]
        );
        let wed = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
        let thu = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(out.table.get(1, "hours"), Some(&Cell::Number(16.0)));
        assert_eq!(out.table.get(1, "start"), Some(&Cell::Date(wed)));
        assert_eq!(out.table.get(1, "end"), Some(&Cell::Date(thu)));
        assert!(out.table.rows().all(|r| r.len() == out.table.columns().len()));
    }

    #[test]
    fn test_rejects_non_array() {
        let err = from_json_str(r#"{"id": "T1"}"#).unwrap_err();
        assert!(matches!(err, PlanError::ParseJson(_)));
    }

    #[test]
    fn test_empty_array() {
        let table = from_json_str("[]").unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
        assert_eq!(to_json_string(&table).unwrap(), "[]");
    }
}
