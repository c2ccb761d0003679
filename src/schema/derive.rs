use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

use super::ColumnSchema;

/// Keys that always lead the table, in this order.
pub const PREFERRED_ORDER: &[&str] = &[
    "package_no",
    "item_name",
    "quantity",
    "material",
    "gross_weight",
    "dimension",
    "volume",
];

/// Derive the column order for a record set.
///
///  - Gather every distinct key across all object records
///  - Preferred keys first, in `PREFERRED_ORDER`
///  - Everything else after, in locale-style alphabetical order
///
/// The result depends only on the set of keys, never on record order or on
/// key order inside a record.
pub fn derive_schema(records: &[Value]) -> ColumnSchema {
    let mut keys: Vec<&str> = records
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|obj| obj.keys().map(String::as_str))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    keys.sort_by(|a, b| compare_keys(a, b));
    debug!(columns = keys.len(), records = records.len(), "derived schema");
    ColumnSchema::new(keys)
}

/// Keys in order of first appearance. Used for CSV export when no table
/// schema has been built.
pub fn collect_keys(records: &[Value]) -> ColumnSchema {
    ColumnSchema::new(
        records
            .iter()
            .filter_map(Value::as_object)
            .flat_map(|obj| obj.keys().cloned()),
    )
}

fn preferred_rank(key: &str) -> Option<usize> {
    PREFERRED_ORDER.iter().position(|p| *p == key)
}

pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (preferred_rank(a), preferred_rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => locale_cmp(a, b),
    }
}

/// Approximates a default collation: punctuation before digits before
/// letters, letters compared case-insensitively, then lowercase before
/// uppercase, then raw code points so distinct keys never tie.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    fn primary(c: char) -> (u8, char) {
        let class = if c.is_alphabetic() {
            2
        } else if c.is_numeric() {
            1
        } else {
            0
        };
        (class, c.to_lowercase().next().unwrap_or(c))
    }

    a.chars()
        .map(primary)
        .cmp(b.chars().map(primary))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}
