use crate::error::{ClipforgeError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

pub const DEFAULT_DATA_DIR: &str = ".clipforge";

pub const CACHE_DIR: &str = "cache";
pub const CONFIG_FILE: &str = "config.yaml";

/// Store name used by the text pipeline.
pub const PIPELINE_STORE: &str = "pipeline";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

pub fn cache_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(CACHE_DIR)
}

pub fn store_path(data_dir: &Path, name: &str) -> PathBuf {
    cache_dir(data_dir).join(format!("{name}.json"))
}

/// Default per-user data directory: `$HOME/.clipforge`.
pub fn default_data_dir() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(ClipforgeError::HomeNotFound)?;
    Ok(home.join(DEFAULT_DATA_DIR))
}

// ---------------------------------------------------------------------------
// Name validation (presets, store names)
// ---------------------------------------------------------------------------

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 64 || !name_re().is_match(name) {
        return Err(ClipforgeError::InvalidName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
