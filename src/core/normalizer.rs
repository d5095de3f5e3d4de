//! Record normalization
//!
//! Rows arrive either with database column names (`item_quantity`) or with raw CSV
//! headers (`"Item Quantity"`). Both are mapped onto `OrderRecord` here so nothing
//! downstream ever sees the difference.

use serde_json::{Map, Value};
use tracing::debug;

use crate::core::types::OrderRecord;
use crate::error::AppError;

/// A loosely-typed row as handed over by an ingestion source
pub(crate) type RawRow = Map<String, Value>;

const ORDER_ID: &[&str] = &["order_id", "orderId", "Order ID", "Order Id", "Order Number"];
const ITEM_QUANTITY: &[&str] = &["item_quantity", "itemQuantity", "Item Quantity", "Quantity", "qty"];
const ORDER_DATE: &[&str] = &["order_date", "orderDate", "Order Date", "Date"];
const VARIATION_NAME: &[&str] = &[
    "variation_name",
    "variationName",
    "Variation Name",
    "Product",
    "Product Name",
];
const ATTRIBUTE: &[&str] = &["attribute", "Attribute", "Attributes"];
const MARKETPLACE: &[&str] = &["marketplace", "Marketplace", "Referrer", "Sales Channel"];
const DELIVERY_COUNTRY: &[&str] = &[
    "delivery_country",
    "deliveryCountry",
    "Delivery Country",
    "Country",
];
const VARIATION_NUMBER: &[&str] = &[
    "variation_number",
    "variationNumber",
    "Variation Number",
    "Variation No.",
    "SKU",
];

/// Lowercase and drop separators so "Item Quantity", "item_quantity" and
/// "itemQuantity" compare equal
fn fold_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn lookup<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a Value> {
    for alias in aliases {
        if let Some(v) = row.get(*alias)
            && !v.is_null()
        {
            return Some(v);
        }
    }
    let folded: Vec<String> = aliases.iter().map(|a| fold_key(a)).collect();
    row.iter()
        .find(|(k, v)| !v.is_null() && folded.contains(&fold_key(k)))
        .map(|(_, v)| v)
}

fn text_field(row: &RawRow, aliases: &[&str]) -> String {
    match lookup(row, aliases) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Parse a quantity; anything that is not a non-negative whole number becomes 0
pub(crate) fn parse_quantity(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(whole_non_negative))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<u64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(whole_non_negative))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn whole_non_negative(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then(|| f as u64)
}

/// Map one row onto the canonical record. Total: never fails.
pub(crate) fn normalize_row(row: &RawRow) -> OrderRecord {
    OrderRecord {
        order_id: text_field(row, ORDER_ID),
        item_quantity: parse_quantity(lookup(row, ITEM_QUANTITY)),
        order_date: text_field(row, ORDER_DATE),
        variation_name: text_field(row, VARIATION_NAME),
        attribute: text_field(row, ATTRIBUTE),
        marketplace: text_field(row, MARKETPLACE),
        delivery_country: text_field(row, DELIVERY_COUNTRY),
        variation_number: text_field(row, VARIATION_NUMBER),
    }
}

pub(crate) fn normalize_rows(rows: &[RawRow]) -> Vec<OrderRecord> {
    let records: Vec<OrderRecord> = rows.iter().map(normalize_row).collect();
    debug!(rows = records.len(), "normalized rows");
    records
}

/// Split an untyped JSON document into rows. Only a top-level array of objects is
/// accepted; anything else is a contract violation by the caller.
pub(crate) fn rows_from_value(value: Value) -> Result<Vec<RawRow>, AppError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(AppError::MalformedInput {
                reason: format!("expected an array of order rows, found {}", kind_of(&other)),
            });
        }
    };
    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(row) => rows.push(row),
            other => {
                return Err(AppError::MalformedInput {
                    reason: format!("row {index} is {}, expected an object", kind_of(&other)),
                });
            }
        }
    }
    Ok(rows)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
