// src/project/csv.rs

use anyhow::{Context, Result};
use serde_json::Value;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;

use super::{cell_text, project_row};
use crate::schema::{collect_keys, ColumnSchema};

pub const CSV_MIME: &str = "text/csv;charset=utf-8";

/// Serialize `records` as CSV.
///
/// - Header row = labeled schema columns
/// - One line per record, cells in schema order, every line `\n`-terminated
/// - Without a schema, keys are taken in order of first appearance
/// - An empty schema yields an empty document
pub fn to_csv(records: &[Value], schema: Option<&ColumnSchema>) -> String {
    let fallback;
    let schema = match schema {
        Some(s) => s,
        None => {
            fallback = collect_keys(records);
            &fallback
        }
    };
    if schema.is_empty() {
        return String::new();
    }

    let mut out = schema
        .labels()
        .iter()
        .map(|label| escape(label))
        .collect::<Vec<_>>()
        .join(",");
    out.push('\n');

    for record in records {
        let line = project_row(record, schema)
            .iter()
            .map(|value| escape(&cell_text(value)))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Quote a field only when it holds a comma or a double quote.
pub fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// A CSV export ready to be saved as `<basename>.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvDocument {
    pub file_name: String,
    pub mime: &'static str,
    pub body: String,
}

impl CsvDocument {
    pub fn new(basename: &str, body: String) -> Self {
        Self {
            file_name: format!("{}.csv", basename),
            mime: CSV_MIME,
            body,
        }
    }

    /// Write into `dir`, replacing any previous export of the same name.
    /// Goes through a temp file and a rename so readers never see half a file.
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;

        let path = dir.join(&self.file_name);
        let tmp_path = dir.join(format!(".{}.tmp", self.file_name));
        let mut tmp = fs::File::create(&tmp_path)
            .with_context(|| format!("creating {:?}", tmp_path))?;
        tmp.write_all(self.body.as_bytes())
            .with_context(|| format!("writing {:?}", tmp_path))?;
        tmp.sync_all()?;

        fs::rename(&tmp_path, &path)
            .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path))?;
        info!(path = %path.display(), bytes = self.body.len(), "wrote csv");
        Ok(path)
    }
}
