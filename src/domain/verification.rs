//! Verification result types shared by every source adapter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a verification result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// Downloaded opinion files on disk
    Local,
    /// CourtListener search API
    PrimaryApi,
    /// Court website opinion search
    CourtSite,
    /// Legislature Century Code pages
    StatuteSite,
    /// Case.law API
    BackupApi,
    /// Synthesized result, no source confirmed the citation
    None,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Local => "local",
            Source::PrimaryApi => "primary-api",
            Source::CourtSite => "court-site",
            Source::StatuteSite => "statute-site",
            Source::BackupApi => "backup-api",
            Source::None => "none",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether the source confirmed the citation exists
    pub exists: bool,

    /// Case name ("Party v. Party") or statute title, when known
    #[serde(default, rename = "case_or_statute_name", alias = "name")]
    pub name: String,

    /// Full citation as the source reports it
    #[serde(default)]
    pub full_citation: String,

    /// Link (or file path) to the authority
    #[serde(default, rename = "source_url", alias = "url")]
    pub url: String,

    /// Adapter that produced the result
    pub source: Source,

    /// Why the lookup failed, if it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Tagged view of a result for callers that branch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    Found,
    NotFound,
    Failed(&'a str),
}

impl VerificationResult {
    /// The source confirmed the citation
    pub fn found(
        source: Source,
        name: impl Into<String>,
        full_citation: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            exists: true,
            name: name.into(),
            full_citation: full_citation.into(),
            url: url.into(),
            source,
            error: None,
        }
    }

    /// The lookup completed but the citation was not there
    pub fn not_found(source: Source, full_citation: impl Into<String>) -> Self {
        Self {
            exists: false,
            name: String::new(),
            full_citation: full_citation.into(),
            url: String::new(),
            source,
            error: None,
        }
    }

    /// The lookup could not be completed or nothing confirmed the citation
    pub fn failed(
        source: Source,
        full_citation: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::not_found(source, full_citation)
        }
    }

    pub fn outcome(&self) -> Outcome<'_> {
        match (self.exists, self.error.as_deref()) {
            (true, _) => Outcome::Found,
            (false, Some(error)) => Outcome::Failed(error),
            (false, None) => Outcome::NotFound,
        }
    }
}
