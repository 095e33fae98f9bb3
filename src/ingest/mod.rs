//! Case document ingestion.
//!
//! Briefs arrive as PDFs (or text already pulled out of them). This module
//! turns them into text and guesses what each document is:
//!
//! 1. **Extractor**: file → text, page by page
//! 2. **Classifier**: filename/caption → document type
//!
//! # Flow
//!
//! ```text
//! brief.pdf → pdftotext → pages → record citation extractor
//!                 ↓
//!             classifier
//! ```

pub mod classifier;
pub mod extractor;

// Re-export key types
pub use classifier::{classify, DocumentType};
pub use extractor::{
    extractor_for, split_pages, ExtractError, PdfToTextExtractor, PlainTextExtractor,
    TextExtractor,
};
