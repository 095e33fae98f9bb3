//! Core verification logic.
//!
//! This module contains:
//! - DiskCache: Partitioned persistent cache with negative-result expiry
//! - Throttle: Request spacing for scraped sites
//! - CitationVerifier: Fallback-chain orchestrator

pub mod cache;
pub mod throttle;
pub mod verifier;

// Re-export commonly used types
pub use cache::{CacheError, CachePartition, Clock, DiskCache, NEGATIVE_TTL};
pub use throttle::Throttle;
pub use verifier::{CitationVerifier, VerifierConfig, VerifierError, NO_SOURCES};
