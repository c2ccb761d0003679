// src/preview/mod.rs

//! Describe a document before it is submitted.

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Text previews stop after this many characters.
pub const TEXT_PREVIEW_LIMIT: usize = 5000;
const TRUNCATED_NOTICE: &str = "\n\n[File too large to display completely]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Pdf,
    /// Holds the (possibly truncated) leading text.
    Text(String),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePreview {
    pub name: String,
    pub mime: &'static str,
    pub size: u64,
    pub kind: PreviewKind,
}

/// Content type from the file extension. Unknown types are
/// `application/octet-stream`.
pub fn guess_mime(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "bmp" => "image/bmp",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// `0 Bytes`, `512 Bytes`, `1.5 KB`, `2 MB` ... base 1024, at most two
/// decimals, capped at GB.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut idx = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && idx < UNITS.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[idx])
}

/// First `TEXT_PREVIEW_LIMIT` characters, with a notice when cut.
pub fn text_preview(content: &str) -> String {
    match content.char_indices().nth(TEXT_PREVIEW_LIMIT) {
        Some((cut, _)) => format!("{}{}", &content[..cut], TRUNCATED_NOTICE),
        None => content.to_string(),
    }
}

fn is_text(mime: &str) -> bool {
    matches!(mime, "text/plain" | "text/csv" | "application/json")
}

pub fn describe<P: AsRef<Path>>(path: P) -> Result<FilePreview> {
    let path = path.as_ref();
    let meta = fs::metadata(path).with_context(|| format!("reading metadata for {:?}", path))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mime = guess_mime(&name);

    let kind = if mime.starts_with("image/") {
        PreviewKind::Image
    } else if mime == "application/pdf" {
        PreviewKind::Pdf
    } else if is_text(mime) {
        let bytes = fs::read(path).with_context(|| format!("reading {:?}", path))?;
        PreviewKind::Text(text_preview(&String::from_utf8_lossy(&bytes)))
    } else {
        PreviewKind::Other
    };

    Ok(FilePreview {
        name,
        mime,
        size: meta.len(),
        kind,
    })
}

impl FilePreview {
    pub fn render(&self) -> String {
        let mut out = format!(
            "File name: {}\nFile type: {}\nFile size: {}\n",
            self.name,
            self.mime,
            format_file_size(self.size)
        );
        match &self.kind {
            PreviewKind::Text(text) => {
                out.push('\n');
                out.push_str(text);
                out.push('\n');
            }
            PreviewKind::Image | PreviewKind::Pdf => {}
            PreviewKind::Other => out.push_str("Preview not available for this file type\n"),
        }
        out
    }
}
