//! Flat row to nested record reshaping.

use fuiman_ingest::{Cell, CellReader, format_timestamp};
use fuiman_schema::{
    ADDRESS_PREFIXES, ColumnType, PERSONAL_PREFIX, REQUEST_PREFERENCE_PREFIX, SEPARATOR,
    SchemaDefinition, USER_IMPORT_SCHEMA,
};
use polars::prelude::DataFrame;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::Result;
use crate::record::{UserRecord, prune};

/// Key of the address list inside `personal`.
const ADDRESSES_KEY: &str = "addresses";
/// Flag added to every kept address.
const PRIMARY_ADDRESS_KEY: &str = "primaryAddress";

/// Transforms a validated frame using the user import schema.
pub fn transform(df: &DataFrame) -> Result<Vec<UserRecord>> {
    transform_with_schema(&USER_IMPORT_SCHEMA, df)
}

/// Transforms a validated frame into nested records, one per row, in order.
///
/// Columns unknown to the schema are skipped.
pub fn transform_with_schema(
    schema: &SchemaDefinition,
    df: &DataFrame,
) -> Result<Vec<UserRecord>> {
    let reader = CellReader::new(df);
    let mut columns = Vec::new();
    for name in reader.column_names() {
        let Some(rule) = schema.column(&name) else {
            warn!(column = %name, "Skipping column outside the schema");
            continue;
        };
        let cells = reader.cells(&name)?;
        columns.push((rule.name, rule.column_type, cells));
    }

    let records: Vec<UserRecord> = (0..reader.height())
        .map(|row| {
            let flat = columns
                .iter()
                .map(|(name, column_type, cells)| {
                    let value = cells.get(row).map_or(Value::Null, |cell| {
                        convert(cell, *column_type, schema.list_delimiter)
                    });
                    (*name, value)
                })
                .collect();
            nest(flat)
        })
        .collect();

    debug!(records = records.len(), "Transformed rows");
    Ok(records)
}

/// Converts one cell according to its column type.
fn convert(cell: &Cell, column_type: ColumnType, delimiter: char) -> Value {
    if cell.is_null() {
        return Value::Null;
    }
    match column_type {
        ColumnType::String => Value::String(cell.render()),
        ColumnType::Boolean => cell.as_bool().map_or(Value::Null, Value::Bool),
        ColumnType::DateTime => cell
            .as_timestamp()
            .map_or(Value::Null, |ts| Value::String(format_timestamp(&ts))),
        ColumnType::List => Value::Array(
            cell.list_items(delimiter)
                .into_iter()
                .map(Value::String)
                .collect(),
        ),
        ColumnType::Structured => serde_json::from_str(&cell.render()).unwrap_or(Value::Null),
    }
}

/// Folds flat `(column, value)` pairs into the nested record shape.
fn nest(flat: Vec<(&str, Value)>) -> UserRecord {
    let mut top = Map::new();
    let mut personal = Map::new();
    let mut request_preference = Map::new();
    let mut addresses: Vec<Map<String, Value>> =
        ADDRESS_PREFIXES.iter().map(|_| Map::new()).collect();

    for (column, value) in flat {
        if let Some((slot, field)) = ADDRESS_PREFIXES
            .iter()
            .enumerate()
            .find_map(|(slot, (prefix, _))| sub_field(column, prefix).map(|field| (slot, field)))
        {
            addresses[slot].insert(field.to_string(), value);
        } else if let Some(field) = sub_field(column, PERSONAL_PREFIX) {
            personal.insert(field.to_string(), value);
        } else if let Some(field) = sub_field(column, REQUEST_PREFERENCE_PREFIX) {
            request_preference.insert(field.to_string(), value);
        } else {
            top.insert(column.to_string(), value);
        }
    }

    let kept: Vec<Value> = addresses
        .into_iter()
        .zip(ADDRESS_PREFIXES)
        .filter(|(address, _)| address.values().any(|v| !v.is_null()))
        .map(|(mut address, (_, primary))| {
            address.insert(PRIMARY_ADDRESS_KEY.to_string(), Value::Bool(primary));
            Value::Object(address)
        })
        .collect();
    if !kept.is_empty() {
        personal.insert(ADDRESSES_KEY.to_string(), Value::Array(kept));
    }
    top.insert(PERSONAL_PREFIX.to_string(), Value::Object(personal));
    top.insert(
        REQUEST_PREFERENCE_PREFIX.to_string(),
        Value::Object(request_preference),
    );

    match prune(Value::Object(top)) {
        Some(Value::Object(map)) => UserRecord::new(map),
        _ => UserRecord::default(),
    }
}

/// `personal_lastName` under `personal` yields `lastName`.
fn sub_field<'a>(column: &'a str, prefix: &str) -> Option<&'a str> {
    column
        .strip_prefix(prefix)?
        .strip_prefix(SEPARATOR)
        .filter(|field| !field.is_empty())
}
