//! Citation extraction for briefs and memos.
//!
//! Two independent parsers share one pattern library:
//! - `record`: reduces in-record references ("(R45:12:¶3)", "R. 123",
//!   "Idx 45-52") in brief text to a set of record item numbers
//! - `parser`: finds legal citations in memo text line by line and
//!   normalizes each into a canonical lookup key
//!
//! The legal-citation patterns are disjoint from one another, but not from
//! the record grammar: "N.D.R.Civ.P. 12" contains an `R` followed by text
//! and a number. That overlap is resolved only in the record extractor.

pub mod parser;
pub mod patterns;
pub mod record;

pub use parser::{
    extract_unique_case_citations, extract_unique_statute_citations, parse_citations,
};
pub use patterns::{normalize, pattern, split_home_citation};
pub use record::{
    detect_case_number, extract_record_citations, extract_record_numbers,
    extract_record_numbers_from_pages, format_items_file, format_items_file_dated,
};
