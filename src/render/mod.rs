// src/render/mod.rs

//! Turn one settled request into something to show.

use anyhow::Result;
use clap::ValueEnum;
use serde_json::Value;
use tracing::{info, warn};

use crate::project::{render_table, PackingList};

/// Result of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Records were found; table and CSV come from the same schema.
    Table(PackingList),
    /// No known shape matched; show the response as text.
    Raw(String),
    /// The request itself failed. Shown verbatim.
    Error(String),
}

/// Stdout rendering for a [`Outcome::Table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl Outcome {
    pub fn from_response(response: &Value) -> Self {
        match PackingList::from_response(response) {
            Some(list) => {
                info!(
                    records = list.records().len(),
                    columns = list.schema().len(),
                    "packing list found"
                );
                Outcome::Table(list)
            }
            None => {
                info!("no packing list in response, showing raw output");
                Outcome::Raw(raw_text(response))
            }
        }
    }

    /// Settle a request: a transport failure becomes `Error`, anything else
    /// goes through the locator.
    pub fn settle(result: Result<Value>) -> Self {
        match result {
            Ok(response) => Self::from_response(&response),
            Err(err) => {
                warn!(error = %err, "request failed");
                Outcome::Error(format!("Error: {:#}", err))
            }
        }
    }

    pub fn packing_list(&self) -> Option<&PackingList> {
        match self {
            Outcome::Table(list) => Some(list),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        Ok(match self {
            Outcome::Table(list) => match format {
                OutputFormat::Table => render_table(&list.table()),
                OutputFormat::Json => serde_json::to_string_pretty(&list.table())? + "\n",
                OutputFormat::Csv => list.to_csv(),
            },
            Outcome::Raw(text) => format!("{}\n", text),
            Outcome::Error(message) => format!("{}\n", message),
        })
    }
}

/// A string response is shown as-is, anything else pretty-printed.
pub fn raw_text(response: &Value) -> String {
    match response {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
