//! Text extraction from briefs and court documents.
//!
//! Plain text and Markdown are read directly. PDFs are handed to the
//! poppler `pdftotext` binary, which emits a form feed between pages.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Below this many non-whitespace characters a PDF is probably a scan
pub const LOW_TEXT_THRESHOLD: usize = 100;

/// Upper bound on one `pdftotext` run
pub const PDF_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors from text extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run {binary} (is poppler installed?): {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{binary} failed on {path}: {stderr}")]
    Failed {
        binary: String,
        path: PathBuf,
        stderr: String,
    },

    #[error("{binary} timed out after {seconds}s on {path}")]
    Timeout {
        binary: String,
        path: PathBuf,
        seconds: u64,
    },

    #[error("Unsupported file type: {0}")]
    Unsupported(PathBuf),
}

/// Turns a document into text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Whole-document text
    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let pages = self.extract_pages(path).await?;
        Ok(pages
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// `(page_number, page_text)` pairs, numbered from 1
    async fn extract_pages(&self, path: &Path) -> Result<Vec<(u32, String)>, ExtractError>;
}

/// `.txt` and `.md` files; the whole file is page 1
#[derive(Debug, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn extract_pages(&self, path: &Path) -> Result<Vec<(u32, String)>, ExtractError> {
        Ok(vec![(1, self.extract(path).await?)])
    }
}

/// PDFs via `pdftotext -layout <file> -`
#[derive(Debug)]
pub struct PdfToTextExtractor {
    binary: String,
    timeout: Duration,
}

impl Default for PdfToTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfToTextExtractor {
    /// Uses `$PDFTOTEXT_PATH` if set, else `pdftotext` from `PATH`
    pub fn new() -> Self {
        let binary = std::env::var("PDFTOTEXT_PATH").unwrap_or_else(|_| "pdftotext".to_string());
        Self::with_binary(binary)
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: PDF_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, path: &Path) -> Result<String, ExtractError> {
        let child = Command::new(&self.binary)
            .arg("-layout")
            .arg(path)
            .arg("-")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = timeout(self.timeout, child)
            .await
            .map_err(|_| ExtractError::Timeout {
                binary: self.binary.clone(),
                path: path.to_path_buf(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|source| ExtractError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractError::Failed {
                binary: self.binary.clone(),
                path: path.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        let visible = text.chars().filter(|c| !c.is_whitespace()).count();
        if visible < LOW_TEXT_THRESHOLD {
            warn!(
                file = %path.display(),
                chars = visible,
                "Low text extraction, may be a scanned PDF"
            );
        }
        debug!(file = %path.display(), chars = text.len(), "Extracted PDF text");
        Ok(text)
    }
}

#[async_trait]
impl TextExtractor for PdfToTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        Ok(self.run(path).await?.replace('\x0c', "\n"))
    }

    async fn extract_pages(&self, path: &Path) -> Result<Vec<(u32, String)>, ExtractError> {
        Ok(split_pages(&self.run(path).await?))
    }
}

/// Split `pdftotext` output on form feeds, dropping the empty tail page
pub fn split_pages(text: &str) -> Vec<(u32, String)> {
    let mut pages: Vec<&str> = text.split('\x0c').collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }

    (1..)
        .zip(pages)
        .map(|(number, page)| (number, page.to_string()))
        .collect()
}

/// Pick an extractor by file extension
pub fn extractor_for(path: &Path) -> Result<Box<dyn TextExtractor>, ExtractError> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => Ok(Box::new(PdfToTextExtractor::new())),
        "txt" | "md" => Ok(Box::new(PlainTextExtractor)),
        _ => Err(ExtractError::Unsupported(path.to_path_buf())),
    }
}
