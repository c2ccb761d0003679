// src/project/mod.rs

//! Project located records onto a column schema.
//!
//! A [`PackingList`] is built once per response and owns both the records and
//! the derived schema, so the on-screen table and the CSV export always share
//! one column order.

pub mod csv;
pub mod text;

use serde::Serialize;
use serde_json::Value;

use crate::locate::locate;
use crate::schema::{derive_schema, ColumnSchema};

pub use self::csv::{to_csv, CsvDocument, CSV_MIME};
pub use self::text::render_table;

/// Records plus the schema derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct PackingList {
    records: Vec<Value>,
    schema: ColumnSchema,
}

/// Labeled headers and projected rows, ready to display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl PackingList {
    /// Use records a caller has already isolated.
    pub fn from_records(records: Vec<Value>) -> Self {
        let schema = derive_schema(&records);
        Self { records, schema }
    }

    /// Locate the records inside a raw response. `None` means the caller
    /// should show the response itself.
    pub fn from_response(response: &Value) -> Option<Self> {
        locate(response).map(|records| Self::from_records(records.clone()))
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// One projected row per record, cells in schema order.
    pub fn rows(&self) -> Vec<Vec<Value>> {
        self.records
            .iter()
            .map(|record| project_row(record, &self.schema))
            .collect()
    }

    pub fn table(&self) -> Table {
        Table {
            headers: self.schema.labels(),
            rows: self.rows(),
        }
    }

    pub fn to_csv(&self) -> String {
        to_csv(&self.records, Some(&self.schema))
    }

    pub fn csv_document(&self, basename: &str) -> CsvDocument {
        CsvDocument::new(basename, self.to_csv())
    }
}

pub fn project_row(record: &Value, schema: &ColumnSchema) -> Vec<Value> {
    schema.keys().iter().map(|key| cell(record, key)).collect()
}

/// The value shown for `key` on `record`. Missing, falsy and nested values
/// all come back as an empty string.
pub fn cell(record: &Value, key: &str) -> Value {
    match record.get(key) {
        Some(value) if is_shown(value) => value.clone(),
        _ => Value::String(String::new()),
    }
}

fn is_shown(value: &Value) -> bool {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
    }
}

/// Text form of a projected cell.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                float_text(n.as_f64().unwrap_or_default())
            }
        }
        _ => String::new(),
    }
}

/// Floats in `[1e-6, 1e21)` print as plain decimals, anything else in
/// exponent form with an explicit sign (`1e+21`, `1.5e-7`).
fn float_text(f: f64) -> String {
    let magnitude = f.abs();
    if f == 0.0 || (1e-6..1e21).contains(&magnitude) {
        return f.to_string();
    }
    let exp = format!("{:e}", f);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}
