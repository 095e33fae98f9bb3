//! Rendering of verification results for the memo reader.

pub mod appendix;

pub use appendix::{append_appendix, render_appendix};
