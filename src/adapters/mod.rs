//! Citation source adapters.
//!
//! Each adapter answers "does this citation exist?" against one source:
//! downloaded opinions on disk, the CourtListener API, the court's own
//! opinion search, the legislature's Century Code pages, or the Case.law
//! API. Every adapter owns a cache partition and never returns an error to
//! the caller; failures come back as a [`VerificationResult`] with `error`
//! set.

pub mod caselaw;
pub mod court_site;
pub mod courtlistener;
pub mod http;
pub mod local;
pub mod statutes;

use std::future::Future;

use async_trait::async_trait;
use tracing::debug;

use crate::core::cache::{CachePartition, NEGATIVE_TTL};
use crate::domain::{CitationKind, Source, VerificationResult};

pub use caselaw::CaseLaw;
pub use court_site::CourtSite;
pub use courtlistener::{sanitize_api_key, CourtListener};
pub use http::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestClient};
pub use local::LocalOpinions;
pub use statutes::Statutes;

/// Trait for verification sources
#[async_trait]
pub trait CitationSource: Send + Sync {
    /// Human-readable source name, used in progress and failure messages
    fn name(&self) -> &str;

    /// Tag recorded on results from this source
    fn source(&self) -> Source;

    /// Whether this source can answer for citations of `kind`
    fn handles(&self, kind: CitationKind) -> bool;

    /// Whether the source is configured (credentials, data directory)
    fn is_available(&self) -> bool;

    /// Look up a normalized citation
    async fn verify(&self, citation: &str) -> VerificationResult;
}

/// Serve `key` from `cache`, or run `lookup` and remember its answer.
///
/// Confirmed citations are kept forever. Anything else (not found, or a
/// failed lookup) is kept for [`NEGATIVE_TTL`] and then retried.
pub(crate) async fn cached<F>(cache: &CachePartition, key: &str, lookup: F) -> VerificationResult
where
    F: Future<Output = VerificationResult>,
{
    if let Some(hit) = cache.get::<VerificationResult>(key) {
        debug!(partition = cache.name(), citation = key, exists = hit.exists, "Cache hit");
        return hit;
    }

    let result = lookup.await;
    let ttl = if result.exists { None } else { Some(NEGATIVE_TTL) };
    cache.set(key, &result, ttl);
    result
}
