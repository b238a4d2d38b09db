use anyhow::Context;
use std::path::{Path, PathBuf};

/// Resolve the clipforge data directory.
///
/// Priority:
/// 1. `--data-dir` flag / `CLIPFORGE_DATA_DIR` env var (passed in as `explicit`)
/// 2. `$HOME/.clipforge`
pub fn resolve_data_dir(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    clipforge_core::paths::default_data_dir().context("failed to resolve data directory")
}
