// src/schema/types.rs

use serde::{Deserialize, Serialize};

use super::label::header_label;

/// Ordered, duplicate-free list of record keys. Drives both the table column
/// order and the CSV header order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Default)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ColumnSchema {
    keys: Vec<String>,
}

impl ColumnSchema {
    /// Build a schema from keys, dropping any repeats after the first.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            if !out.contains(&key) {
                out.push(key);
            }
        }
        Self { keys: out }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Display labels, one per key, in schema order.
    pub fn labels(&self) -> Vec<String> {
        self.keys.iter().map(|k| header_label(k)).collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl From<Vec<String>> for ColumnSchema {
    fn from(keys: Vec<String>) -> Self {
        Self::new(keys)
    }
}

impl From<ColumnSchema> for Vec<String> {
    fn from(schema: ColumnSchema) -> Self {
        schema.keys
    }
}
