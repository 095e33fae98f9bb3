//! Configuration for bench-memo.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (COURTLISTENER_API_KEY, COURT_DATA, BENCH_MEMO_CACHE_DIR)
//! 2. Config file (.bench-memo/config.yaml)
//! 3. Defaults (no API key, no court data, ./cache)
//!
//! Config file discovery:
//! - Searches current directory and parents for .bench-memo/config.yaml
//! - Paths in config file are relative to the project root (the parent of .bench-memo/)
//!
//! Missing credentials are not errors here: the verifier skips sources it
//! cannot use.

pub mod paths;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::sanitize_api_key;
use crate::core::throttle::DEFAULT_INTERVAL;
use crate::core::VerifierConfig;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

pub const ENV_API_KEY: &str = "COURTLISTENER_API_KEY";
pub const ENV_COURT_DATA: &str = "COURT_DATA";
pub const ENV_CACHE_DIR: &str = "BENCH_MEMO_CACHE_DIR";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub courtlistener: CourtListenerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourtListenerConfig {
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Downloaded opinions root (contains markdown/)
    pub court_data: Option<String>,
    /// Verification cache directory
    pub cache_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerificationConfig {
    /// Spacing between scraper requests, in milliseconds (at least 1000)
    pub request_interval_ms: Option<u64>,
}

/// Resolved configuration with absolute paths where known
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Sanitized CourtListener token
    pub courtlistener_api_key: Option<String>,
    /// Downloaded opinions root
    pub court_data: Option<PathBuf>,
    /// Verification cache directory
    pub cache_dir: PathBuf,
    /// Spacing between scraper requests
    pub request_interval: Duration,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            courtlistener_api_key: None,
            court_data: None,
            cache_dir: PathBuf::from("./cache"),
            request_interval: DEFAULT_INTERVAL,
            config_file: None,
        }
    }
}

impl ResolvedConfig {
    /// Constructor parameters for the verifier
    pub fn verifier_config(&self) -> VerifierConfig {
        VerifierConfig {
            courtlistener_api_key: self.courtlistener_api_key.clone(),
            court_data_dir: self.court_data.clone(),
            cache_dir: self.cache_dir.clone(),
            request_interval: self.request_interval,
        }
    }

    /// The API key with all but its edges hidden, for display
    pub fn masked_api_key(&self) -> String {
        match &self.courtlistener_api_key {
            Some(key) => mask_secret(key),
            None => "(not set)".to_string(),
        }
    }
}

/// "abcd****wxyz"; short secrets are hidden entirely
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}

/// Find config file by searching `start` and its parents
fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(paths::CONFIG_DIR_NAME).join(paths::CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge file values and environment lookups over the defaults
fn resolve(
    file: Option<(&Path, &ConfigFile)>,
    lookup_env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let env = |name: &str| lookup_env(name).filter(|value| !value.trim().is_empty());
    let defaults = ResolvedConfig::default();

    // Base directory is the parent of .bench-memo/ (i.e., grandparent of config.yaml)
    let base_dir = file
        .and_then(|(path, _)| path.parent())
        .and_then(|p| p.parent())
        .unwrap_or(Path::new("."));
    let from_file = |pick: fn(&ConfigFile) -> Option<&String>| {
        file.and_then(|(_, config)| pick(config))
            .map(|value| resolve_path(base_dir, value))
    };

    let courtlistener_api_key = env(ENV_API_KEY)
        .or_else(|| file.and_then(|(_, config)| config.courtlistener.api_key.clone()))
        .map(|raw| sanitize_api_key(&raw))
        .filter(|key| !key.is_empty());

    let court_data = env(ENV_COURT_DATA)
        .map(PathBuf::from)
        .or_else(|| from_file(|c| c.paths.court_data.as_ref()));

    let cache_dir = env(ENV_CACHE_DIR)
        .map(PathBuf::from)
        .or_else(|| from_file(|c| c.paths.cache_dir.as_ref()))
        .unwrap_or(defaults.cache_dir);

    // The config may slow scrapers down, never speed them past one request a second
    let request_interval = file
        .and_then(|(_, config)| config.verification.request_interval_ms)
        .map(Duration::from_millis)
        .map_or(defaults.request_interval, |interval| interval.max(DEFAULT_INTERVAL));

    ResolvedConfig {
        courtlistener_api_key,
        court_data,
        cache_dir,
        request_interval,
        config_file: file.map(|(path, _)| path.to_path_buf()),
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let config_file = find_config_file_from(&cwd);
    let parsed = match &config_file {
        Some(path) => Some((path.as_path(), load_config_file(path)?)),
        None => None,
    };

    Ok(resolve(
        parsed.as_ref().map(|(path, config)| (*path, config)),
        |name| std::env::var(name).ok(),
    ))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(root: &Path, yaml: &str) -> PathBuf {
        let dir = root.join(paths::CONFIG_DIR_NAME);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(paths::CONFIG_FILE_NAME);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{yaml}").unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = resolve(None, no_env);
        assert_eq!(config.courtlistener_api_key, None);
        assert_eq!(config.court_data, None);
        assert_eq!(config.cache_dir, PathBuf::from("./cache"));
        assert_eq!(config.request_interval, Duration::from_secs(1));
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            temp.path(),
            r#"
version: "1"
courtlistener:
  api_key: "abc123  # from the dashboard"
paths:
  court_data: ./court
  cache_dir: /var/cache/bench-memo
verification:
  request_interval_ms: 250
"#,
        );

        let file = load_config_file(&path).unwrap();
        let config = resolve(Some((path.as_path(), &file)), no_env);

        assert_eq!(config.courtlistener_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.court_data, Some(temp.path().join("./court")));
        assert_eq!(config.cache_dir, PathBuf::from("/var/cache/bench-memo"));
        assert_eq!(config.request_interval, Duration::from_secs(1), "floored at one second");
        assert_eq!(config.config_file, Some(path));
    }

    #[test]
    fn test_slower_request_interval_is_kept() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "verification:\n  request_interval_ms: 2500\n");
        let file = load_config_file(&path).unwrap();

        let config = resolve(Some((path.as_path(), &file)), no_env);
        assert_eq!(config.request_interval, Duration::from_millis(2500));
        assert_eq!(config.verifier_config().request_interval, Duration::from_millis(2500));
    }

    #[test]
    fn test_zero_request_interval_is_floored() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "verification:\n  request_interval_ms: 0\n");
        let file = load_config_file(&path).unwrap();

        let config = resolve(Some((path.as_path(), &file)), no_env);
        assert_eq!(config.verifier_config().request_interval, DEFAULT_INTERVAL);
    }

    #[test]
    fn test_env_overrides_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "paths:\n  cache_dir: ./from-file\n");
        let file = load_config_file(&path).unwrap();

        let env: HashMap<&str, &str> = [
            (ENV_API_KEY, " env-key # comment"),
            (ENV_CACHE_DIR, "/tmp/env-cache"),
            (ENV_COURT_DATA, "   "),
        ]
        .into_iter()
        .collect();
        let config = resolve(Some((path.as_path(), &file)), |name| {
            env.get(name).map(|v| v.to_string())
        });

        assert_eq!(config.courtlistener_api_key.as_deref(), Some("env-key"));
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/env-cache"));
        assert_eq!(config.court_data, None, "blank env values are ignored");
    }

    #[test]
    fn test_comment_only_key_is_absent() {
        let config = resolve(None, |name| {
            (name == ENV_API_KEY).then(|| "# paste key here".to_string())
        });
        assert_eq!(config.courtlistener_api_key, None);
        assert_eq!(config.masked_api_key(), "(not set)");
    }

    #[test]
    fn test_find_config_file_in_parent() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "version: \"1\"");
        let nested = temp.path().join("cases").join("2025");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_file_from(&nested), Some(path));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("short"), "****");
        assert_eq!(mask_secret("0123456789abcdef"), "0123****cdef");
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
