// src/fetch/mod.rs

//! Upload a document to the extraction service and return its JSON reply.

use anyhow::{anyhow, bail, Context, Result};
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{debug, info, instrument};
use url::Url;

use crate::preview::guess_mime;

/// Default `timeout` form field, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// What to send for one submission.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: PathBuf,
    /// Forwarded to the service; not enforced locally.
    pub timeout_secs: u64,
    pub include_metadata: bool,
}

impl UploadRequest {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            include_metadata: false,
        }
    }
}

/// Client for the extraction endpoint. Only one submission may be in flight
/// at a time; a second one is rejected until the first settles.
pub struct ExtractionClient {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    in_flight: Semaphore,
}

impl ExtractionClient {
    pub fn new(endpoint: Url, api_key: Option<String>) -> Self {
        Self::with_client(Client::new(), endpoint, api_key)
    }

    pub fn with_client(client: Client, endpoint: Url, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            in_flight: Semaphore::new(1),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Claim the single submission slot.
    fn begin(&self) -> Result<SemaphorePermit<'_>> {
        self.in_flight
            .try_acquire()
            .map_err(|_| anyhow!("a submission is already in progress"))
    }

    /// POST the file as multipart form data and parse the reply as JSON.
    /// A send failure or a non-success status is an error.
    #[instrument(level = "info", skip(self), fields(endpoint = %self.endpoint))]
    pub async fn submit(&self, request: &UploadRequest) -> Result<Value> {
        let _permit = self.begin()?;

        let form = build_form(request).await?;
        let mut builder = self.client.post(self.endpoint.clone()).multipart(form);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.trim());
        }

        info!("uploading");
        let resp = builder
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.endpoint))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("HTTP error! Status: {}", status.as_u16());
        }
        debug!(status = status.as_u16(), "response received");

        resp.json::<Value>()
            .await
            .with_context(|| format!("reading JSON from {}", self.endpoint))
    }
}

/// Form fields: the file under `files` (file name `file`), then `timeout`
/// and `include_metadata` as text.
pub async fn build_form(request: &UploadRequest) -> Result<Form> {
    let bytes = tokio::fs::read(&request.file)
        .await
        .with_context(|| format!("reading {:?}", request.file))?;
    debug!(file = ?request.file, bytes = bytes.len(), "read upload");

    let part = Part::bytes(bytes)
        .file_name("file")
        .mime_str(guess_mime(file_name(&request.file)))
        .context("setting part content type")?;

    Ok(Form::new()
        .part("files", part)
        .text("timeout", request.timeout_secs.to_string())
        .text("include_metadata", request.include_metadata.to_string()))
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|s| s.to_str()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ExtractionClient {
        let url = Url::parse("http://127.0.0.1:9/packinglist/").unwrap();
        ExtractionClient::new(url, Some("  ".to_string()))
    }

    #[test]
    fn blank_api_key_is_dropped() {
        assert!(client().api_key.is_none());
    }

    #[test]
    fn second_submission_is_rejected_while_first_pending() {
        let c = client();
        let first = c.begin().unwrap();
        let err = c.begin().unwrap_err();
        assert_eq!(err.to_string(), "a submission is already in progress");
        drop(first);
        assert!(c.begin().is_ok());
    }

    #[test]
    fn request_defaults() {
        let req = UploadRequest::new("list.pdf");
        assert_eq!(req.timeout_secs, 300);
        assert!(!req.include_metadata);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let req = UploadRequest::new("/definitely/not/here.pdf");
        let err = client().submit(&req).await.unwrap_err();
        assert!(err.to_string().contains("reading"));
    }
}
