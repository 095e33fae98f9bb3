//! Document type detection for case files.
//!
//! The filename stem is tried first, using the clerk's abbreviations
//! ("Apt-Br", "Ape-Br"). If nothing matches, the caption at the top of the
//! text is searched.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Characters of document text searched for a caption
const HEADER_CHARS: usize = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    AppellantBrief,
    AppelleeBrief,
    ReplyBrief,
    Order,
    Judgment,
    Findings,
    NoticeOfAppeal,
    Transcript,
    Exhibit,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::AppellantBrief => "appellant_brief",
            DocumentType::AppelleeBrief => "appellee_brief",
            DocumentType::ReplyBrief => "reply_brief",
            DocumentType::Order => "order",
            DocumentType::Judgment => "judgment",
            DocumentType::Findings => "findings",
            DocumentType::NoticeOfAppeal => "notice",
            DocumentType::Transcript => "transcript",
            DocumentType::Exhibit => "exhibit",
            DocumentType::Other => "other",
        }
    }

    /// Briefs are where record citations come from
    pub fn is_brief(self) -> bool {
        matches!(
            self,
            DocumentType::AppellantBrief | DocumentType::AppelleeBrief | DocumentType::ReplyBrief
        )
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn rules(table: &[(&str, DocumentType)]) -> Vec<(Regex, DocumentType)> {
    table
        .iter()
        .map(|(pattern, doc_type)| {
            let re = Regex::new(&format!("(?i){pattern}"))
                .unwrap_or_else(|e| panic!("invalid classifier pattern {pattern:?}: {e}"));
            (re, *doc_type)
        })
        .collect()
}

static FILENAME_RULES: LazyLock<Vec<(Regex, DocumentType)>> = LazyLock::new(|| {
    rules(&[
        (r"(?:Apt|Appellant).*Reply", DocumentType::ReplyBrief),
        (r"(?:Apt|Appellant).*Br", DocumentType::AppellantBrief),
        (r"(?:Ape|Appellee).*Br", DocumentType::AppelleeBrief),
        (r"Reply.*Br", DocumentType::ReplyBrief),
        (r"Order", DocumentType::Order),
        (r"Judgment", DocumentType::Judgment),
        (r"Finding", DocumentType::Findings),
        (r"Notice.*Appeal", DocumentType::NoticeOfAppeal),
        (r"Transcript", DocumentType::Transcript),
        (r"Exhibit", DocumentType::Exhibit),
    ])
});

static CONTENT_RULES: LazyLock<Vec<(Regex, DocumentType)>> = LazyLock::new(|| {
    rules(&[
        (r"REPLY\s+BRIEF", DocumentType::ReplyBrief),
        (r"APPELLANT['’]?S\s+BRIEF", DocumentType::AppellantBrief),
        (r"APPELLEE['’]?S\s+BRIEF", DocumentType::AppelleeBrief),
        (r"BRIEF\s+OF\s+(?:THE\s+)?APPELLANT", DocumentType::AppellantBrief),
        (r"BRIEF\s+OF\s+(?:THE\s+)?APPELLEE", DocumentType::AppelleeBrief),
        (r"ORDER\s+(?:FOR\s+)?JUDGMENT", DocumentType::Judgment),
        (
            r"(?:IT\s+IS\s+(?:HEREBY\s+)?ORDERED|ORDER\s+OF\s+THE\s+COURT)",
            DocumentType::Order,
        ),
        (r"FINDINGS?\s+OF\s+FACT", DocumentType::Findings),
        (r"NOTICE\s+OF\s+APPEAL", DocumentType::NoticeOfAppeal),
    ])
});

/// Classify by filename, then by the opening of `text`
pub fn classify(filename: &str, text: &str) -> DocumentType {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    if let Some((_, doc_type)) = FILENAME_RULES.iter().find(|(re, _)| re.is_match(&stem)) {
        return *doc_type;
    }

    let header = match text.char_indices().nth(HEADER_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    };
    CONTENT_RULES
        .iter()
        .find(|(re, _)| re.is_match(header))
        .map_or(DocumentType::Other, |(_, doc_type)| *doc_type)
}
