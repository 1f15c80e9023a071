//! JSON rendering of generated rows.

use seed_core::TableRows;
use serde_json::{json, Value};

/// Tables in fill order, each with its rows as column maps.
pub fn rows_to_json(tables: &[TableRows]) -> Value {
    Value::Array(
        tables
            .iter()
            .map(|t| {
                json!({
                    "table": t.table,
                    "rows": t.rows.iter().map(|r| &r.fields).collect::<Vec<_>>(),
                })
            })
            .collect(),
    )
}
