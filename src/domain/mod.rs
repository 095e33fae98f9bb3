//! Domain types for bench-memo.
//!
//! This module contains the core data structures:
//! - Citation: A legal citation found in memo text
//! - RecordCitation: A reference into the trial-court record
//! - VerificationResult: The outcome of one source lookup
//! - VerificationReport: Aggregate results for a whole memo

pub mod citation;
pub mod report;
pub mod verification;

// Re-export commonly used types
pub use citation::{Citation, CitationKind, RecordCitation};
pub use report::VerificationReport;
pub use verification::{Outcome, Source, VerificationResult};
