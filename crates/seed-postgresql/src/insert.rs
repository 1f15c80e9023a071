//! SQL construction and parameter binding for PostgreSQL writes.

use crate::error::PostgreSQLStoreError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use seed_core::{base_type_name, Column, GeneratedRow, GeneratedValue, Table};
use std::str::FromStr;
use tokio_postgres::types::ToSql;

/// Boxed statement parameter.
pub type Param = Box<dyn ToSql + Sync + Send>;

/// Quote an identifier, keeping a schema prefix apart.
pub fn quote_ident(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

/// How a column's values are sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Numeric,
    Bool,
    Text,
    Bytes,
    Uuid,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Json,
    Point,
    /// Sent as text and cast server-side to the column type
    Cast,
}

impl Binding {
    pub fn for_column(column: &Column) -> Self {
        if column.is_array() || !column.enum_values.is_empty() {
            return Binding::Cast;
        }
        let full = column.column_type.to_lowercase();
        if full.contains("with time zone") || full.starts_with("timestamptz") {
            return Binding::TimestampTz;
        }
        match base_type_name(&column.column_type).trim() {
            "smallint" | "int2" | "smallserial" | "serial2" => Binding::Int16,
            "integer" | "int" | "int4" | "serial" | "serial4" => Binding::Int32,
            "bigint" | "int8" | "bigserial" | "serial8" => Binding::Int64,
            "real" | "float4" => Binding::Float32,
            "double precision" | "float8" | "float" => Binding::Float64,
            "numeric" | "decimal" => Binding::Numeric,
            "boolean" | "bool" => Binding::Bool,
            "text" | "varchar" | "character varying" | "char" | "character" | "bpchar"
            | "citext" | "name" => Binding::Text,
            "bytea" => Binding::Bytes,
            "uuid" => Binding::Uuid,
            "date" => Binding::Date,
            "time" | "time without time zone" => Binding::Time,
            "timestamp" | "timestamp without time zone" => Binding::Timestamp,
            "json" | "jsonb" => Binding::Json,
            "point" => Binding::Point,
            _ => Binding::Cast,
        }
    }

    /// Placeholder `$n`, with a cast where the value travels as text.
    pub fn placeholder(self, n: usize, column: &Column) -> String {
        match self {
            Binding::Cast => format!("${n}::text::{}", column.column_type),
            _ => format!("${n}"),
        }
    }

    fn null(self) -> Param {
        match self {
            Binding::Int16 => Box::new(None::<i16>),
            Binding::Int32 => Box::new(None::<i32>),
            Binding::Int64 => Box::new(None::<i64>),
            Binding::Float32 => Box::new(None::<f32>),
            Binding::Float64 => Box::new(None::<f64>),
            Binding::Numeric => Box::new(None::<Decimal>),
            Binding::Bool => Box::new(None::<bool>),
            Binding::Bytes => Box::new(None::<Vec<u8>>),
            Binding::Uuid => Box::new(None::<uuid::Uuid>),
            Binding::Date => Box::new(None::<NaiveDate>),
            Binding::Time => Box::new(None::<NaiveTime>),
            Binding::Timestamp => Box::new(None::<NaiveDateTime>),
            Binding::TimestampTz => Box::new(None::<chrono::DateTime<chrono::Utc>>),
            Binding::Json => Box::new(None::<serde_json::Value>),
            Binding::Point => Box::new(None::<geo_types::Point<f64>>),
            Binding::Text | Binding::Cast => Box::new(None::<String>),
        }
    }
}

/// Columns present in any row, in table order.
pub fn written_columns<'a>(table: &'a Table, rows: &[GeneratedRow]) -> Vec<&'a Column> {
    table
        .columns
        .iter()
        .filter(|c| rows.iter().any(|r| r.get(&c.name).is_some()))
        .collect()
}

/// Generate a multi-row INSERT statement.
pub fn insert_sql(
    table: &Table,
    columns: &[&Column],
    rows: usize,
    override_identity: bool,
) -> String {
    let bindings: Vec<Binding> = columns.iter().map(|c| Binding::for_column(c)).collect();
    let mut param_idx = 1;
    let mut placeholders: Vec<String> = Vec::with_capacity(rows);
    for _ in 0..rows {
        let row_placeholders: Vec<String> = columns
            .iter()
            .zip(&bindings)
            .map(|(column, binding)| {
                let p = binding.placeholder(param_idx, column);
                param_idx += 1;
                p
            })
            .collect();
        placeholders.push(format!("({})", row_placeholders.join(", ")));
    }

    format!(
        "INSERT INTO {} ({}){} VALUES {}",
        quote_ident(&table.name),
        columns
            .iter()
            .map(|c| quote_ident(&c.name))
            .collect::<Vec<_>>()
            .join(", "),
        if override_identity {
            " OVERRIDING SYSTEM VALUE"
        } else {
            ""
        },
        placeholders.join(", ")
    )
}

/// Generate a keyed single-row UPDATE statement. The key is the last
/// parameter.
pub fn update_sql(table: &Table, set: &[&Column], key: &Column) -> String {
    let assignments: Vec<String> = set
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let placeholder = Binding::for_column(column).placeholder(idx + 1, column);
            format!("{} = {placeholder}", quote_ident(&column.name))
        })
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {} = {}",
        quote_ident(&table.name),
        assignments.join(", "),
        quote_ident(&key.name),
        Binding::for_column(key).placeholder(set.len() + 1, key)
    )
}

/// Moves the sequence behind a serial or identity column; parameters are
/// the quoted table name, the column name and the new value.
pub const SETVAL_SQL: &str = "SELECT setval(pg_get_serial_sequence($1, $2), $3)";

/// Generate a TRUNCATE statement that also resets owned sequences.
pub fn truncate_sql(tables: &[&str]) -> String {
    format!(
        "TRUNCATE TABLE {} RESTART IDENTITY CASCADE",
        tables
            .iter()
            .map(|t| quote_ident(t))
            .collect::<Vec<_>>()
            .join(", ")
    )
}

/// Parameters of `rows` for `columns`, row-major.
pub fn row_params(
    table: &Table,
    columns: &[&Column],
    rows: &[GeneratedRow],
) -> Result<Vec<Param>, PostgreSQLStoreError> {
    let mut params = Vec::with_capacity(rows.len() * columns.len());
    for row in rows {
        for column in columns {
            let value = row.get(&column.name).unwrap_or(&GeneratedValue::Null);
            params.push(to_param(&table.name, column, value)?);
        }
    }
    Ok(params)
}

fn boxed<T: ToSql + Sync + Send + 'static>(value: T) -> Param {
    Box::new(value)
}

/// Convert a generated value to a parameter of the column's binding.
pub fn to_param(
    table: &str,
    column: &Column,
    value: &GeneratedValue,
) -> Result<Param, PostgreSQLStoreError> {
    let binding = Binding::for_column(column);
    let mismatch = || PostgreSQLStoreError::Conversion {
        table: table.to_string(),
        column: column.name.clone(),
        column_type: column.column_type.clone(),
        value: pg_text(value),
    };
    if value.is_null() {
        return Ok(binding.null());
    }

    let param = match (binding, value) {
        (Binding::Int16, v) => boxed(v.as_i128().and_then(|i| i16::try_from(i).ok()).ok_or_else(mismatch)?),
        (Binding::Int32, v) => boxed(v.as_i128().and_then(|i| i32::try_from(i).ok()).ok_or_else(mismatch)?),
        (Binding::Int64, v) => boxed(v.as_i128().and_then(|i| i64::try_from(i).ok()).ok_or_else(mismatch)?),
        (Binding::Float32, v) => boxed(as_f64(v).ok_or_else(mismatch)? as f32),
        (Binding::Float64, v) => boxed(as_f64(v).ok_or_else(mismatch)?),
        (Binding::Numeric, v) => boxed(as_decimal(v).ok_or_else(mismatch)?),
        (Binding::Bool, GeneratedValue::Bool(b)) => boxed(*b),
        (Binding::Bytes, GeneratedValue::Bytes(b)) => boxed(b.clone()),
        (Binding::Bytes, GeneratedValue::String(s)) => boxed(s.clone().into_bytes()),
        (Binding::Uuid, GeneratedValue::Uuid(u)) => boxed(*u),
        (Binding::Uuid, GeneratedValue::String(s)) => {
            boxed(uuid::Uuid::parse_str(s).map_err(|_| mismatch())?)
        }
        (Binding::Date, GeneratedValue::Date(d)) => boxed(*d),
        (Binding::Date, GeneratedValue::String(s)) => {
            boxed(NaiveDate::from_str(s).map_err(|_| mismatch())?)
        }
        (Binding::Time, GeneratedValue::Time(t)) => boxed(*t),
        (Binding::Time, GeneratedValue::String(s)) => {
            boxed(NaiveTime::from_str(s).map_err(|_| mismatch())?)
        }
        (Binding::Timestamp, v) => boxed(as_datetime(v).ok_or_else(mismatch)?),
        (Binding::TimestampTz, v) => boxed(as_datetime(v).ok_or_else(mismatch)?.and_utc()),
        (Binding::Json, GeneratedValue::Json(j)) => boxed(j.clone()),
        (Binding::Json, v) => boxed(serde_json::to_value(v).map_err(|_| mismatch())?),
        (Binding::Point, v) => boxed(as_point(v).ok_or_else(mismatch)?),
        (Binding::Text | Binding::Cast, v) => boxed(pg_text(v)),
        _ => return Err(mismatch()),
    };
    Ok(param)
}

fn as_f64(value: &GeneratedValue) -> Option<f64> {
    match value {
        GeneratedValue::Float(f) => Some(*f),
        GeneratedValue::Decimal(s) | GeneratedValue::String(s) => s.parse().ok(),
        other => other.as_i128().map(|i| i as f64),
    }
}

fn as_decimal(value: &GeneratedValue) -> Option<Decimal> {
    match value {
        GeneratedValue::Decimal(s) | GeneratedValue::String(s) => Decimal::from_str(s).ok(),
        GeneratedValue::Float(f) => Decimal::try_from(*f).ok(),
        other => other.as_i128().and_then(|i| Decimal::try_from_i128_with_scale(i, 0).ok()),
    }
}

fn as_datetime(value: &GeneratedValue) -> Option<NaiveDateTime> {
    match value {
        GeneratedValue::DateTime(dt) => Some(*dt),
        GeneratedValue::Date(d) => d.and_hms_opt(0, 0, 0),
        GeneratedValue::String(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::from_str(s))
            .ok(),
        _ => None,
    }
}

fn as_point(value: &GeneratedValue) -> Option<geo_types::Point<f64>> {
    let (x, y) = match value {
        GeneratedValue::Object(map) => (map.get("x")?, map.get("y")?),
        GeneratedValue::Array(items) if items.len() == 2 => (&items[0], &items[1]),
        _ => return None,
    };
    Some(geo_types::Point::new(as_f64(x)?, as_f64(y)?))
}

/// PostgreSQL text form of a value.
pub fn pg_text(value: &GeneratedValue) -> String {
    match value {
        GeneratedValue::Null => "NULL".to_string(),
        GeneratedValue::Bool(b) => b.to_string(),
        GeneratedValue::Int(i) => i.to_string(),
        GeneratedValue::BigInt(i) => i.to_string(),
        GeneratedValue::Float(f) => f.to_string(),
        GeneratedValue::Decimal(s) | GeneratedValue::String(s) => s.clone(),
        GeneratedValue::Bytes(bytes) => {
            let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
            format!("\\x{hex}")
        }
        GeneratedValue::Uuid(u) => u.to_string(),
        GeneratedValue::Date(d) => d.to_string(),
        GeneratedValue::Time(t) => t.to_string(),
        GeneratedValue::DateTime(dt) => dt.to_string(),
        GeneratedValue::Json(j) => j.to_string(),
        GeneratedValue::Array(items) => {
            let elements: Vec<String> = items.iter().map(array_element).collect();
            format!("{{{}}}", elements.join(","))
        }
        GeneratedValue::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            let parts = |names: &[&str]| {
                names
                    .iter()
                    .filter_map(|n| map.get(*n))
                    .map(pg_text)
                    .collect::<Vec<_>>()
                    .join(",")
            };
            match keys.as_slice() {
                ["x", "y"] => format!("({})", parts(&["x", "y"])),
                ["a", "b", "c"] => format!("{{{}}}", parts(&["a", "b", "c"])),
                _ => serde_json::to_string(value).unwrap_or_default(),
            }
        }
    }
}

fn array_element(value: &GeneratedValue) -> String {
    match value {
        GeneratedValue::Null => "NULL".to_string(),
        GeneratedValue::Array(_) => pg_text(value),
        other => format!(
            "\"{}\"",
            pg_text(other).replace('\\', "\\\\").replace('"', "\\\"")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seed_core::{DataType, IdentityKind};
    use std::collections::BTreeMap;

    fn users() -> Table {
        Table::new(
            "users",
            vec![
                Column::new("id", DataType::Number, "integer")
                    .primary()
                    .with_identity(IdentityKind::Always),
                Column::new("email", DataType::String, "varchar(256)"),
                Column::new("addr", DataType::String, "inet"),
            ],
        )
    }

    #[test]
    fn test_insert_sql_placeholders() {
        let table = users();
        let columns: Vec<&Column> = table.columns.iter().collect();
        let sql = insert_sql(&table, &columns, 2, false);
        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"id\", \"email\", \"addr\") VALUES \
             ($1, $2, $3::text::inet), ($4, $5, $6::text::inet)"
        );
    }

    #[test]
    fn test_insert_sql_identity_override() {
        let table = users();
        let columns: Vec<&Column> = table.columns.iter().take(1).collect();
        let sql = insert_sql(&table, &columns, 1, true);
        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"id\") OVERRIDING SYSTEM VALUE VALUES ($1)"
        );
    }

    #[test]
    fn test_update_sql_keys_last() {
        let table = users();
        let set = vec![&table.columns[1]];
        let sql = update_sql(&table, &set, &table.columns[0]);
        assert_eq!(sql, "UPDATE \"users\" SET \"email\" = $1 WHERE \"id\" = $2");
    }

    #[test]
    fn test_truncate_and_quoting() {
        assert_eq!(
            truncate_sql(&["public.users", "odd\"name"]),
            "TRUNCATE TABLE \"public\".\"users\", \"odd\"\"name\" RESTART IDENTITY CASCADE"
        );
    }

    #[test]
    fn test_written_columns_skip_omitted() {
        let table = users();
        let rows = vec![GeneratedRow::new(0)
            .with_field("id", GeneratedValue::Int(1))
            .with_field("addr", GeneratedValue::Null)];
        let names: Vec<_> = written_columns(&table, &rows)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "addr"]);
    }

    #[test]
    fn test_bindings() {
        let binding = |t: &str| Binding::for_column(&Column::new("c", DataType::String, t));
        assert_eq!(binding("int4"), Binding::Int32);
        assert_eq!(binding("numeric(10,2)"), Binding::Numeric);
        assert_eq!(binding("timestamp with time zone"), Binding::TimestampTz);
        assert_eq!(binding("varchar(20)"), Binding::Text);
        assert_eq!(binding("integer[]"), Binding::Cast);
        assert_eq!(binding("interval"), Binding::Cast);
    }

    #[test]
    fn test_conversion_mismatch() {
        let column = Column::new("n", DataType::Number, "smallint");
        assert!(to_param("t", &column, &GeneratedValue::Int(7)).is_ok());
        assert!(to_param("t", &column, &GeneratedValue::Int(70_000)).is_err());
        assert!(to_param("t", &column, &GeneratedValue::Null).is_ok());
    }

    #[test]
    fn test_pg_text() {
        let array = GeneratedValue::Array(vec![
            GeneratedValue::String("a\"b".to_string()),
            GeneratedValue::Null,
        ]);
        assert_eq!(pg_text(&array), "{\"a\\\"b\",NULL}");

        let point = GeneratedValue::Object(BTreeMap::from([
            ("x".to_string(), GeneratedValue::Float(1.5)),
            ("y".to_string(), GeneratedValue::Float(-2.0)),
        ]));
        assert_eq!(pg_text(&point), "(1.5,-2)");
        assert_eq!(pg_text(&GeneratedValue::Bytes(vec![0xde, 0xad])), "\\xdead");
    }
}
