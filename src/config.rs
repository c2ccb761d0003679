// src/config.rs

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

use crate::fetch::{UploadRequest, DEFAULT_TIMEOUT_SECS};
use crate::render::OutputFormat;

pub const DEFAULT_ENDPOINT: &str =
    "http://unstract.oncontrails.cloud/deployment/api/mock_org/packinglist/";

/// Extract packing lists from documents and export them as CSV.
#[derive(Parser, Debug)]
#[command(name = "packlist", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a document and show the extracted packing list
    Submit(SubmitArgs),
    /// Run the pipeline on a saved JSON response
    Render(RenderArgs),
    /// Show what would be uploaded
    Preview {
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Document to upload
    pub file: PathBuf,

    /// Extraction endpoint
    #[arg(long, env = "PACKLIST_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Bearer token for the endpoint
    #[arg(long, env = "PACKLIST_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Processing timeout in seconds, passed to the service
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Ask the service to include metadata
    #[arg(long)]
    pub include_metadata: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// JSON file holding a service response
    pub response: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// How to print the result on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Directory to write `<name>.csv` into
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Base name of the CSV export
    #[arg(long, default_value = "packing_list")]
    pub name: String,
}

impl SubmitArgs {
    pub fn endpoint_url(&self) -> Result<Url> {
        Url::parse(&self.endpoint).with_context(|| format!("invalid endpoint {:?}", self.endpoint))
    }

    pub fn upload_request(&self) -> UploadRequest {
        UploadRequest {
            file: self.file.clone(),
            timeout_secs: self.timeout,
            include_metadata: self.include_metadata,
        }
    }
}
