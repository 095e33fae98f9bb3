//! Command-line interface for bench-memo.
//!
//! Provides commands for verifying the citations in a memo, checking a
//! single citation, reading local opinions, and pulling record citations out
//! of briefs.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{CitationSource, LocalOpinions};
use crate::citations::parse_citations;
use crate::config;
use crate::core::{CitationVerifier, DiskCache};
use crate::domain::{Citation, CitationKind, Outcome, VerificationResult};
use crate::output::append_appendix;

pub mod records;

/// bench-memo - Citation extraction and verification for bench memos
#[derive(Parser, Debug)]
#[command(name = "bench-memo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Debug logging for bench-memo itself
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify every citation in a memo and append the verification appendix
    Verify {
        /// Memo file (Markdown)
        memo: PathBuf,

        /// Write the memo with appendix here instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the full report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Extract record citations from briefs into an items file
    ExtractCites {
        /// Brief files, or a single directory of them (*.pdf, *.txt, *.md)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Write the items file here (prints to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Case number for the header (detected from the briefs if not provided)
        #[arg(long)]
        case_number: Option<String>,
    },

    /// Verify a single citation, e.g. "2024 ND 156"
    Check {
        /// Citation text
        citation: String,

        /// Ask only the backup case-law API
        #[arg(long)]
        backup: bool,
    },

    /// Print a locally stored opinion
    Opinion {
        /// Citation, e.g. "2024 ND 156"
        citation: String,
    },

    /// Show the detected document type of each file
    Classify {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Verify { memo, output, json } => verify_memo(&memo, output, json).await,
            Commands::ExtractCites {
                inputs,
                output,
                case_number,
            } => records::extract_cites(&inputs, output, case_number).await,
            Commands::Check { citation, backup } => check_citation(&citation, backup).await,
            Commands::Opinion { citation } => show_opinion(&citation).await,
            Commands::Classify { files } => records::classify_files(&files).await,
            Commands::Config => show_config(),
        }
    }
}

fn open_verifier() -> Result<CitationVerifier> {
    let cfg = config::config()?;
    CitationVerifier::new(&cfg.verifier_config()).with_context(|| {
        format!(
            "Failed to set up verification (cache at {})",
            cfg.cache_dir.display()
        )
    })
}

/// Parse a single checkable citation out of user input
fn parse_one(text: &str) -> Result<Citation> {
    let Some(citation) = parse_citations(text).into_iter().next() else {
        bail!("Not a recognized citation: {}", text);
    };
    if citation.kind.is_skipped() {
        bail!(
            "{} citations cannot be verified online",
            citation.kind.label()
        );
    }
    Ok(citation)
}

/// Verify a memo and write it back with the appendix
async fn verify_memo(memo: &Path, output: Option<PathBuf>, json: Option<PathBuf>) -> Result<()> {
    let text = tokio::fs::read_to_string(memo)
        .await
        .with_context(|| format!("Failed to read memo: {}", memo.display()))?;

    let verifier = open_verifier()?.with_progress(|msg| eprintln!("  {}", msg));
    let report = verifier.verify_memo(&text).await;

    let output = output.unwrap_or_else(|| memo.to_path_buf());
    tokio::fs::write(&output, append_appendix(&text, &report))
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if let Some(json_path) = json {
        let data = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        tokio::fs::write(&json_path, data)
            .await
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
        eprintln!("  Report written to {}", json_path.display());
    }

    eprintln!("\n✓ Verification complete: {}", report.summary());
    eprintln!("  Appendix written to {}", output.display());

    Ok(())
}

/// Verify one citation through the chain (or the backup API)
async fn check_citation(text: &str, backup: bool) -> Result<()> {
    let citation = parse_one(text)?;
    let verifier = open_verifier()?;

    let result = if backup {
        verifier.verify_with_backup(&citation).await
    } else if citation.kind == CitationKind::Statute {
        verifier.verify_statute(&citation).await
    } else {
        let sources = verifier.sources_for(citation.kind);
        if sources.is_empty() {
            eprintln!("No sources apply to this citation");
        } else {
            eprintln!("Checking {} ({})", citation.normalized, sources.join(" → "));
        }
        verifier.verify_case(&citation).await
    };

    print_result(&citation, &result);
    Ok(())
}

fn print_result(citation: &Citation, result: &VerificationResult) {
    println!("Citation: {} ({})", citation.normalized, citation.kind.label());
    match result.outcome() {
        Outcome::Found => {
            println!("Status:   ✓ verified");
            if !result.name.is_empty() {
                println!("Name:     {}", result.name);
            }
            println!("Source:   {}", result.source);
            if !result.url.is_empty() {
                println!("Link:     {}", result.url);
            }
        }
        Outcome::NotFound => {
            println!("Status:   ✗ not found");
            println!("Source:   {}", result.source);
        }
        Outcome::Failed(error) => {
            println!("Status:   ✗ unverified");
            println!("Reason:   {}", error);
        }
    }
}

/// Print the full text of a local opinion
async fn show_opinion(text: &str) -> Result<()> {
    let citation = parse_one(text)?;
    if !citation.kind.is_home_reporter() {
        bail!("Only ND citations are stored locally: {}", citation.normalized);
    }

    let cfg = config::config()?;
    let cache = DiskCache::open(&cfg.cache_dir).context("Failed to open verification cache")?;
    let local = LocalOpinions::new(cfg.court_data.as_deref(), cache.partition("local")?);
    if !local.is_available() {
        bail!("Local opinions not available (set COURT_DATA to a directory containing markdown/)");
    }

    match local.get_opinion_text(&citation.normalized).await {
        Some(opinion) => {
            print!("{}", opinion);
            Ok(())
        }
        None => bail!("No local opinion for {}", citation.normalized),
    }
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let cfg = config::config()?;
    let display = |p: &Option<PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    };

    println!("bench-memo configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Verification:");
    println!("  CourtListener API key: {}", cfg.masked_api_key());
    println!("  Court data:            {}", display(&cfg.court_data));
    println!("  Cache directory:       {}", cfg.cache_dir.display());
    println!("  Request interval:      {}ms", cfg.request_interval.as_millis());
    println!();
    println!(
        "Log file: {}",
        config::paths::log_file()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "(unavailable)".to_string())
    );

    Ok(())
}
