use crate::error::Result;
use crate::io::atomic_write;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Well-known keys
// ---------------------------------------------------------------------------

/// Operation list of the most recently finished session.
pub const KEY_LAST: &str = "last";
/// Name → operation-list mapping of saved presets.
pub const KEY_PERSISTED: &str = "persisted";
/// Transform key → invocation count.
pub const KEY_USAGE: &str = "usage";
/// Transform key → last-used epoch milliseconds.
pub const KEY_TIMESTAMPS: &str = "timestamps";

// ---------------------------------------------------------------------------
// Ttl
// ---------------------------------------------------------------------------

/// Entry time-to-live. `Never` disables the staleness check entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    Never,
    Millis(i64),
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A stored value stamped with its write time. An entry is stale when
/// `now - expires >= ttl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub expires: i64,
    pub data: Value,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// A JSON-backed key-value store for one script name. Loaded once at session
/// start; flushed back to disk after every mutation.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    ttl: Ttl,
    entries: BTreeMap<String, Entry>,
}

impl Store {
    /// Open the store at `path`. A missing file loads as empty; unreadable
    /// JSON propagates as an error.
    pub fn open(path: impl Into<PathBuf>, ttl: Ttl) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, ttl, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_stale(&self, entry: &Entry, now: i64) -> bool {
        match self.ttl {
            Ttl::Never => false,
            Ttl::Millis(ttl) => now - entry.expires >= ttl,
        }
    }

    /// Fetch and deserialize a live entry. Stale or missing entries, and
    /// entries that no longer deserialize as `T`, read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let now = Utc::now().timestamp_millis();
        let entry = self.entries.get(key)?;
        if self.is_stale(entry, now) {
            return None;
        }
        serde_json::from_value(entry.data.clone()).ok()
    }

    pub fn contains(&self, key: &str) -> bool {
        let now = Utc::now().timestamp_millis();
        self.entries
            .get(key)
            .is_some_and(|e| !self.is_stale(e, now))
    }

    /// Store a value under `key`, stamping it with the current time, and
    /// flush the whole store to disk.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let entry = Entry {
            expires: Utc::now().timestamp_millis(),
            data: serde_json::to_value(value)?,
        };
        self.entries.insert(key.to_string(), entry);
        self.flush()
    }

    /// Remove `key` if present and flush.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        tracing::debug!(path = %self.path.display(), "flushing store");
        let data = serde_json::to_string_pretty(&self.entries)?;
        atomic_write(&self.path, data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
