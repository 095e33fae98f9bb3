//! Lookup in downloaded Supreme Court opinions.
//!
//! Opinions live at `<court_data>/markdown/<year>/<year>ND<number>.md`.
//! Only home-reporter citations ("2024 ND 156") can be answered here.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info};

use super::{cached, CitationSource};
use crate::citations::split_home_citation;
use crate::core::cache::CachePartition;
use crate::domain::{CitationKind, Source, VerificationResult};

/// Only this much of an opinion is searched for the caption
const CAPTION_CHARS: usize = 2000;

static CAPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([A-Z][A-Za-z.\-\s]+?)\s*(?:,\s*\n)?\s*v\.\s*\n?\s*([A-Z][A-Za-z.\-\s]+?)(?:\s*\n|,)",
    )
    .unwrap_or_else(|e| panic!("invalid caption pattern: {e}"))
});

/// Local opinion files
pub struct LocalOpinions {
    markdown_dir: Option<PathBuf>,
    cache: CachePartition,
}

impl LocalOpinions {
    /// `court_data_dir` may be absent or point at a tree without `markdown/`;
    /// either way the adapter reports itself unavailable.
    pub fn new(court_data_dir: Option<&Path>, cache: CachePartition) -> Self {
        let markdown_dir = court_data_dir
            .map(|dir| dir.join("markdown"))
            .filter(|dir| dir.is_dir());

        if markdown_dir.is_none() {
            info!("Local opinions not available (COURT_DATA not set or markdown/ not found)");
        }

        Self {
            markdown_dir,
            cache,
        }
    }

    /// Look up a home-reporter citation on disk
    pub async fn verify_citation(&self, citation: &str) -> VerificationResult {
        if self.markdown_dir.is_none() {
            return VerificationResult::failed(Source::Local, citation, "Local data not configured");
        }
        if split_home_citation(citation).is_none() {
            return VerificationResult::failed(Source::Local, citation, "Not an ND citation");
        }

        cached(&self.cache, citation, self.lookup(citation)).await
    }

    /// Full text of a locally stored opinion
    pub async fn get_opinion_text(&self, citation: &str) -> Option<String> {
        let path = self.opinion_path(citation)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Opinion file not readable");
                None
            }
        }
    }

    async fn lookup(&self, citation: &str) -> VerificationResult {
        let Some(path) = self.opinion_path(citation) else {
            return VerificationResult::not_found(Source::Local, citation);
        };

        if !tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
            return VerificationResult::not_found(Source::Local, citation);
        }

        let name = match tokio::fs::read(&path).await {
            Ok(bytes) => extract_case_name(&String::from_utf8_lossy(&bytes)),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Could not read opinion caption");
                String::new()
            }
        };

        VerificationResult::found(Source::Local, name, citation, path.display().to_string())
    }

    fn opinion_path(&self, citation: &str) -> Option<PathBuf> {
        let dir = self.markdown_dir.as_ref()?;
        let (year, number) = split_home_citation(citation)?;
        Some(dir.join(year).join(format!("{year}ND{number}.md")))
    }
}

#[async_trait]
impl CitationSource for LocalOpinions {
    fn name(&self) -> &str {
        "local data"
    }

    fn source(&self) -> Source {
        Source::Local
    }

    fn handles(&self, kind: CitationKind) -> bool {
        kind.is_home_reporter()
    }

    fn is_available(&self) -> bool {
        self.markdown_dir.is_some()
    }

    async fn verify(&self, citation: &str) -> VerificationResult {
        self.verify_citation(citation).await
    }
}

/// "Party v. Party" from the opening of an opinion, or empty
pub fn extract_case_name(text: &str) -> String {
    let head = match text.char_indices().nth(CAPTION_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    };

    let Some(caps) = CAPTION.captures(head) else {
        return String::new();
    };
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str().trim());

    let plaintiff = group(1).lines().last().unwrap_or_default().trim();
    let defendant = group(2).lines().next().unwrap_or_default().trim();
    format!("{plaintiff} v. {defendant}")
}
