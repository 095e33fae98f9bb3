//! bench-memo - Citation extraction and verification for appellate bench memos
//!
//! Finds the legal citations in a generated bench memo and checks that each
//! one exists, and reduces the record citations in the parties' briefs to a
//! list of record items to fetch.
//!
//! # Verification
//!
//! Case citations walk a fallback chain and stop at the first source that
//! confirms them:
//! - Local opinion files (North Dakota reporter only)
//! - CourtListener (needs an API key)
//! - The court's own opinion search (North Dakota reporter only)
//!
//! Statutes are checked against the Century Code on the legislature's site.
//! Rules and record pincites are reported but never checked. Every source
//! caches its answers: confirmations forever, everything else for a day.
//!
//! # Modules
//!
//! - `citations`: Pattern library, memo parser, record citation extractor
//! - `adapters`: Verification sources (local, CourtListener, court site, statutes, Case.law)
//! - `core`: Cache, throttle, and the verification orchestrator
//! - `domain`: Data structures (Citation, VerificationResult, VerificationReport)
//! - `ingest`: Text extraction and document classification for briefs
//! - `output`: Markdown appendix
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Verify a memo and append the appendix
//! bench-memo verify memo.md
//!
//! # Check one citation
//! bench-memo check "2024 ND 156"
//!
//! # Build a record items file from the briefs in a case folder
//! bench-memo extract-cites ./20250305/ -o items.txt
//! ```

pub mod adapters;
pub mod citations;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod ingest;
pub mod output;

// Re-export main types at crate root for convenience
pub use crate::core::{CitationVerifier, DiskCache, VerifierConfig};
pub use adapters::CitationSource;
pub use citations::{extract_record_numbers, parse_citations};
pub use domain::{Citation, CitationKind, RecordCitation, Source, VerificationReport, VerificationResult};
