//! Verification orchestrator.
//!
//! Case citations walk an ordered fallback chain and stop at the first
//! source that confirms them:
//!
//! 1. local opinion files (home reporter only, when configured)
//! 2. CourtListener (any reporter, when an API key is set)
//! 3. the court's opinion search (home reporter only)
//!
//! Statutes go to the legislature site. Rules and record pincites cannot be
//! checked online and are reported as skipped. The Case.law adapter is kept
//! out of the chain; [`CitationVerifier::verify_with_backup`] asks it
//! directly.
//!
//! Citations are verified one at a time, in memo order. The scrapers'
//! one-request-per-second spacing relies on that.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::adapters::{
    CaseLaw, CitationSource, CourtListener, CourtSite, HttpClient, HttpError, LocalOpinions,
    ReqwestClient, Statutes,
};
use crate::citations::{
    extract_unique_case_citations, extract_unique_statute_citations, parse_citations,
};
use crate::domain::{Citation, CitationKind, Source, VerificationReport, VerificationResult};

use super::cache::{CacheError, DiskCache};
use super::throttle::{Throttle, DEFAULT_INTERVAL};

/// Error text when no chain step applied to a citation
pub const NO_SOURCES: &str =
    "No verification sources available (set COURTLISTENER_API_KEY or COURT_DATA)";

/// Inputs the verifier needs; nothing is read from the environment here
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// CourtListener token, possibly with an inline `# comment`
    pub courtlistener_api_key: Option<String>,

    /// Root of the downloaded opinions tree (contains `markdown/`)
    pub court_data_dir: Option<PathBuf>,

    /// Where cache partitions are stored
    pub cache_dir: PathBuf,

    /// Spacing between requests to each scraped site
    pub request_interval: Duration,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            courtlistener_api_key: None,
            court_data_dir: None,
            cache_dir: PathBuf::from("./cache"),
            request_interval: DEFAULT_INTERVAL,
        }
    }
}

/// Errors while assembling a verifier
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Http(#[from] HttpError),
}

type ProgressFn = Box<dyn Fn(&str) + Send + Sync>;

/// Verifies every checkable citation in a memo
pub struct CitationVerifier {
    chain: Vec<Arc<dyn CitationSource>>,
    statutes: Arc<dyn CitationSource>,
    backup: Arc<dyn CitationSource>,
    progress: ProgressFn,
}

impl CitationVerifier {
    /// Verifier backed by the live sources and an on-disk cache
    pub fn new(config: &VerifierConfig) -> Result<Self, VerifierError> {
        Self::with_http(config, Arc::new(ReqwestClient::new()?))
    }

    /// Live source adapters over a caller-supplied HTTP client
    pub fn with_http(
        config: &VerifierConfig,
        http: Arc<dyn HttpClient>,
    ) -> Result<Self, VerifierError> {
        let cache = DiskCache::open(&config.cache_dir)?;
        Ok(Self::build(config, http, &cache)?)
    }

    /// Assemble the standard chain; each adapter gets its own cache partition
    pub fn build(
        config: &VerifierConfig,
        http: Arc<dyn HttpClient>,
        cache: &DiskCache,
    ) -> Result<Self, CacheError> {
        let local = LocalOpinions::new(config.court_data_dir.as_deref(), cache.partition("local")?);
        let courtlistener = CourtListener::new(
            config.courtlistener_api_key.as_deref(),
            http.clone(),
            cache.partition("courtlistener")?,
        );
        let court_site = CourtSite::new(http.clone(), cache.partition("nd_courts")?)
            .with_throttle(Throttle::new(config.request_interval));
        let statutes = Statutes::new(http.clone(), cache.partition("nd_statutes")?)
            .with_throttle(Throttle::new(config.request_interval));
        let backup = CaseLaw::new(http, cache.partition("caselaw")?);

        Ok(Self::from_sources(
            vec![Arc::new(local), Arc::new(courtlistener), Arc::new(court_site)],
            Arc::new(statutes),
            Arc::new(backup),
        ))
    }

    /// Verifier over arbitrary sources; `chain` is tried in order
    pub fn from_sources(
        chain: Vec<Arc<dyn CitationSource>>,
        statutes: Arc<dyn CitationSource>,
        backup: Arc<dyn CitationSource>,
    ) -> Self {
        Self {
            chain,
            statutes,
            backup,
            progress: Box::new(|_| {}),
        }
    }

    /// Receive a one-line message before each phase and each case lookup
    pub fn with_progress(mut self, progress: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Names of the chain steps that would be attempted for `kind`, in order
    pub fn sources_for(&self, kind: CitationKind) -> Vec<&str> {
        self.applicable(kind).map(|s| s.name()).collect()
    }

    /// Verify every case and statute citation in `memo`
    #[instrument(skip_all, fields(memo_len = memo.len()))]
    pub async fn verify_memo(&self, memo: &str) -> VerificationReport {
        let mut report = VerificationReport::new();

        let cases = extract_unique_case_citations(memo);
        (self.progress)(&format!("Verifying {} case citations...", cases.len()));
        for (i, citation) in cases.iter().enumerate() {
            (self.progress)(&format!(
                "Verifying case {}/{}: {}",
                i + 1,
                cases.len(),
                citation.normalized
            ));
            let result = self.verify_case(citation).await;
            report.record(citation.clone(), result);
        }

        let statutes = extract_unique_statute_citations(memo);
        if !statutes.is_empty() {
            (self.progress)(&format!("Verifying {} statute citations...", statutes.len()));
            for citation in &statutes {
                let result = self.verify_statute(citation).await;
                report.record(citation.clone(), result);
            }
        }

        for citation in parse_citations(memo) {
            if citation.kind.is_skipped() {
                report.skip(citation);
            }
        }

        info!("Verification complete: {}", report.summary());
        report
    }

    /// Walk the fallback chain for one case citation
    pub async fn verify_case(&self, citation: &Citation) -> VerificationResult {
        let mut attempted = Vec::new();

        for source in self.applicable(citation.kind) {
            attempted.push(source.name());
            let result = source.verify(&citation.normalized).await;
            if result.exists {
                debug!(citation = %citation.normalized, source = source.name(), "Verified");
                return result;
            }
            debug!(
                citation = %citation.normalized,
                source = source.name(),
                error = result.error.as_deref().unwrap_or(""),
                "Not confirmed, falling through"
            );
        }

        let error = if attempted.is_empty() {
            NO_SOURCES.to_string()
        } else {
            format!("Not found in {}", attempted.join(", "))
        };
        VerificationResult::failed(Source::None, citation.normalized.as_str(), error)
    }

    /// Check one Century Code citation
    pub async fn verify_statute(&self, citation: &Citation) -> VerificationResult {
        self.statutes.verify(&citation.normalized).await
    }

    /// Ask the backup case-law source directly, bypassing the chain
    pub async fn verify_with_backup(&self, citation: &Citation) -> VerificationResult {
        if !self.backup.handles(citation.kind) {
            return VerificationResult::failed(
                self.backup.source(),
                citation.normalized.as_str(),
                format!("{} only checks case citations", self.backup.name()),
            );
        }
        self.backup.verify(&citation.normalized).await
    }

    fn applicable(&self, kind: CitationKind) -> impl Iterator<Item = &Arc<dyn CitationSource>> {
        self.chain
            .iter()
            .filter(move |source| source.handles(kind) && source.is_available())
    }
}
