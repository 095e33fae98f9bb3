//! Canonical paths for bench-memo.
//!
//! Single source of truth - import this instead of hardcoding paths.
//!
//! | Location | Purpose |
//! |----------|---------|
//! | `~/.bench-memo/logs/bench-memo.log` | Run log |
//! | `<project>/.bench-memo/config.yaml` | Project configuration |
//! | `<cache_dir>/<partition>/cache.db` | Verification cache (see `core::cache`) |

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Directory holding per-user state, and per-project config
pub const CONFIG_DIR_NAME: &str = ".bench-memo";

pub const CONFIG_FILE_NAME: &str = "config.yaml";

pub const LOG_FILE_NAME: &str = "bench-memo.log";

/// Per-user state directory (~/.bench-memo)
pub fn app_home() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(CONFIG_DIR_NAME))
}

/// Log directory (~/.bench-memo/logs)
pub fn log_dir() -> Result<PathBuf> {
    Ok(app_home()?.join("logs"))
}

/// Log file (~/.bench-memo/logs/bench-memo.log)
pub fn log_file() -> Result<PathBuf> {
    Ok(log_dir()?.join(LOG_FILE_NAME))
}
