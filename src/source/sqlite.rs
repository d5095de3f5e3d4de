//! SQLite storage: read an orders table as rows, persist normalized records

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, params};
use serde_json::Value;
use tracing::{debug, info};

use super::Source;
use crate::core::{OrderRecord, RawRow};
use crate::error::AppError;

pub(crate) const DEFAULT_TABLE: &str = "orders";

/// Table names are interpolated into SQL, so only plain identifiers pass
pub(crate) fn validate_table(name: &str) -> Result<&str, AppError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(AppError::InvalidTable {
            name: name.to_string(),
        })
    }
}

fn json_value(value: ValueRef<'_>) -> Option<Value> {
    match value {
        ValueRef::Null => Some(Value::Null),
        ValueRef::Integer(n) => Some(Value::from(n)),
        ValueRef::Real(f) => Some(serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number)),
        ValueRef::Text(t) => Some(Value::String(String::from_utf8_lossy(t).into_owned())),
        ValueRef::Blob(_) => None,
    }
}

pub(crate) fn load_table(path: &Path, table: &str) -> Result<Vec<RawRow>, AppError> {
    let table = validate_table(table)?;
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let mut stmt = conn.prepare(&format!("SELECT * FROM \"{table}\""))?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let rows = stmt.query_map([], |row| {
        let mut map = RawRow::new();
        for (i, name) in columns.iter().enumerate() {
            if let Some(v) = json_value(row.get_ref(i)?) {
                map.insert(name.clone(), v);
            }
        }
        Ok(map)
    })?;

    let rows = rows.collect::<Result<Vec<_>, _>>()?;
    debug!(table, rows = rows.len(), "read sqlite table");
    Ok(rows)
}

/// Insert records in one transaction, creating the table on first use.
/// Returns the number of inserted rows.
pub(crate) fn save_records(path: &Path, table: &str, records: &[OrderRecord]) -> Result<usize, AppError> {
    let table = validate_table(table)?;
    let mut conn = Connection::open(path)?;
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS \"{table}\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id TEXT NOT NULL,
            item_quantity INTEGER NOT NULL,
            order_date TEXT NOT NULL,
            variation_name TEXT NOT NULL,
            attribute TEXT NOT NULL,
            marketplace TEXT NOT NULL,
            delivery_country TEXT NOT NULL,
            variation_number TEXT NOT NULL
        )"
    ))?;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO \"{table}\" (order_id, item_quantity, order_date, variation_name, \
             attribute, marketplace, delivery_country, variation_number) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
        ))?;
        for r in records {
            stmt.execute(params![
                r.order_id,
                i64::try_from(r.item_quantity).unwrap_or(i64::MAX),
                r.order_date,
                r.variation_name,
                r.attribute,
                r.marketplace,
                r.delivery_country,
                r.variation_number,
            ])?;
        }
    }
    tx.commit()?;

    info!(table, rows = records.len(), path = %path.display(), "saved records");
    Ok(records.len())
}

pub(crate) struct SqliteSource {
    path: std::path::PathBuf,
    table: String,
}

impl SqliteSource {
    pub(crate) fn new(path: std::path::PathBuf, table: String) -> Self {
        Self { path, table }
    }
}

impl Source for SqliteSource {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn location(&self) -> String {
        format!("{}#{}", self.path.display(), self.table)
    }

    fn load(&self) -> Result<Vec<RawRow>, AppError> {
        load_table(&self.path, &self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize_rows;

    fn record(id: &str, qty: u64, country: &str) -> OrderRecord {
        OrderRecord {
            order_id: id.to_string(),
            item_quantity: qty,
            order_date: "2024-01-05".to_string(),
            delivery_country: country.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn table_name_validation() {
        assert!(validate_table("orders").is_ok());
        assert!(validate_table("_orders_2024").is_ok());
        assert!(validate_table("2024").is_err());
        assert!(validate_table("orders; DROP TABLE x").is_err());
        assert!(validate_table("").is_err());
    }

    #[test]
    fn save_then_load_round_trips_through_normalizer() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("orders.db");
        let records = vec![record("A", 2, "DE"), record("B", 5, "")];

        assert_eq!(save_records(&db, DEFAULT_TABLE, &records).unwrap(), 2);
        let rows = SqliteSource::new(db.clone(), DEFAULT_TABLE.into()).load().unwrap();
        assert_eq!(normalize_rows(&rows), records);

        // appends on second import
        save_records(&db, DEFAULT_TABLE, &records).unwrap();
        assert_eq!(load_table(&db, DEFAULT_TABLE).unwrap().len(), 4);
    }

    #[test]
    fn loads_foreign_schema_columns() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("shop.db");
        let conn = Connection::open(&db).unwrap();
        conn.execute_batch(
            "CREATE TABLE sales (\"Order ID\" TEXT, \"Item Quantity\" REAL, note BLOB);
             INSERT INTO sales VALUES ('X', 3.0, x'00');
             INSERT INTO sales VALUES (NULL, NULL, NULL);",
        )
        .unwrap();
        drop(conn);

        let rows = load_table(&db, "sales").unwrap();
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].contains_key("note"));
        let records = normalize_rows(&rows);
        assert_eq!(records[0].order_id, "X");
        assert_eq!(records[0].item_quantity, 3);
        assert_eq!(records[1], OrderRecord::default());
    }

    #[test]
    fn missing_database_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_table(&dir.path().join("absent.db"), DEFAULT_TABLE).unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
