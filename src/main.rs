//! bench-memo CLI entrypoint

use std::fs::{File, OpenOptions};
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bench_memo::cli::Cli;
use bench_memo::config::paths;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse first so --verbose can shape logging
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    cli.execute().await
}

/// Log to stderr, and to ~/.bench-memo/logs/bench-memo.log when it can be opened
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info,bench_memo=debug" } else { "info" };

    let file_layer = open_log_file().map(|file| {
        fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();
}

fn open_log_file() -> Option<File> {
    let dir = paths::log_dir().ok()?;
    std::fs::create_dir_all(&dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(paths::LOG_FILE_NAME))
        .ok()
}
