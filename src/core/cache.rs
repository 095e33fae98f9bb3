//! Persistent verification cache.
//!
//! Each adapter gets its own named partition, stored as a SQLite database at
//! `<cache_dir>/<partition>/cache.db`. Values are JSON; an entry either never
//! expires or carries an absolute expiry timestamp and is dropped on the
//! first read after it.
//!
//! Reads and writes are best effort: a failing cache behaves like an empty
//! one. Two processes racing on the same key can both miss and both write;
//! the value is the same either way.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// How long "not found" answers are trusted before the source is asked again
pub const NEGATIVE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Source of "now" for expiry decisions
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Errors that can occur with the cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache partition '{0}' lock poisoned")]
    Poisoned(String),
}

fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Root of the on-disk cache; hands out partitions
pub struct DiskCache {
    root: PathBuf,
    clock: Clock,
}

impl DiskCache {
    /// Open (creating if needed) a cache rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            clock: system_clock(),
        })
    }

    /// Use a custom clock for every partition opened afterwards
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open the partition `name`
    pub fn partition(&self, name: &str) -> Result<CachePartition, CacheError> {
        let dir = self.root.join(name);
        std::fs::create_dir_all(&dir)?;

        let conn = Connection::open(dir.join("cache.db"))?;
        conn.busy_timeout(Duration::from_secs(5))?;
        CachePartition::from_connection(name, conn, self.clock.clone())
    }
}

/// One adapter's slice of the cache
#[derive(Clone)]
pub struct CachePartition {
    name: String,
    conn: Arc<Mutex<Connection>>,
    clock: Clock,
}

impl fmt::Debug for CachePartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachePartition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl CachePartition {
    /// A partition that lives only as long as this handle (tests, dry runs)
    pub fn in_memory(name: &str) -> Result<Self, CacheError> {
        Self::from_connection(name, Connection::open_in_memory()?, system_clock())
    }

    fn from_connection(name: &str, conn: Connection, clock: Clock) -> Result<Self, CacheError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                stored_at INTEGER NOT NULL,
                expires_at INTEGER
            );",
        )?;

        Ok(Self {
            name: name.to_string(),
            conn: Arc::new(Mutex::new(conn)),
            clock,
        })
    }

    /// Replace the clock used for expiry
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cached value for `key`, or `None` on miss, expiry or any cache failure
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(partition = %self.name, key, error = %e, "Cache read failed");
                None
            }
        }
    }

    /// Store `value` under `key`; `ttl = None` means it never expires
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        if let Err(e) = self.try_set(key, value, ttl) {
            warn!(partition = %self.name, key, error = %e, "Cache write failed");
        }
    }

    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let conn = self.lock()?;
        let row: Option<(String, Option<i64>)> = conn
            .query_row(
                "SELECT value, expires_at FROM entries WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((value, expires_at)) = row else {
            return Ok(None);
        };

        if let Some(expires_at) = expires_at {
            if expires_at <= (self.clock)().timestamp() {
                conn.execute("DELETE FROM entries WHERE key = ?1", params![key])?;
                return Ok(None);
            }
        }

        Ok(Some(serde_json::from_str(&value)?))
    }

    pub fn try_set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;
        let now = (self.clock)().timestamp();
        let expires_at = ttl.map(|ttl| {
            now.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX))
        });

        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO entries (key, value, stored_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![key, json, now, expires_at],
        )?;
        Ok(())
    }

    /// Drop one entry
    pub fn remove(&self, key: &str) -> Result<bool, CacheError> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM entries WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    /// Drop every entry, returning how many there were
    pub fn clear(&self) -> Result<usize, CacheError> {
        let conn = self.lock()?;
        Ok(conn.execute("DELETE FROM entries", [])?)
    }

    /// Number of stored entries (including expired ones not yet read)
    pub fn len(&self) -> Result<usize, CacheError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, CacheError> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Poisoned(self.name.clone()))
    }
}
