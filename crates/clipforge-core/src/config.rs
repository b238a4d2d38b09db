use crate::error::Result;
use crate::io::atomic_write;
use crate::paths;
use crate::store::Ttl;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ranking decay window in days.
    #[serde(default = "default_decay_window_days")]
    pub decay_window_days: u32,

    /// Store entry TTL in milliseconds; absent means entries never expire.
    #[serde(default)]
    pub cache_ttl_ms: Option<i64>,

    /// Editor for manual edit; falls back to $VISUAL / $EDITOR / vi.
    #[serde(default)]
    pub editor: Option<String>,

    /// Explicit jq binary path; PATH lookup otherwise.
    #[serde(default)]
    pub jq_bin: Option<String>,
}

fn default_decay_window_days() -> u32 {
    7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decay_window_days: default_decay_window_days(),
            cache_ttl_ms: None,
            editor: None,
            jq_bin: None,
        }
    }
}

impl Config {
    /// Load `config.yaml` from the data dir; a missing file loads defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = paths::config_path(data_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let path = paths::config_path(data_dir);
        let data = serde_yaml::to_string(self)?;
        atomic_write(&path, data.as_bytes())
    }

    pub fn decay_window_ms(&self) -> i64 {
        i64::from(self.decay_window_days) * 24 * 60 * 60 * 1000
    }

    pub fn ttl(&self) -> Ttl {
        match self.cache_ttl_ms {
            Some(ms) => Ttl::Millis(ms),
            None => Ttl::Never,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.decay_window_days, 7);
        assert_eq!(config.ttl(), Ttl::Never);
        assert!(config.editor.is_none());
    }

    #[test]
    fn roundtrip() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            decay_window_days: 14,
            cache_ttl_ms: Some(60_000),
            editor: Some("nano".to_string()),
            jq_bin: None,
        };
        config.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.decay_window_days, 14);
        assert_eq!(loaded.ttl(), Ttl::Millis(60_000));
        assert_eq!(loaded.editor.as_deref(), Some("nano"));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.yaml"), "decay_window_days: 3\n").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.decay_window_days, 3);
        assert_eq!(config.ttl(), Ttl::Never);
    }

    #[test]
    fn decay_window_ms_conversion() {
        let config = Config::default();
        assert_eq!(config.decay_window_ms(), 7 * 24 * 60 * 60 * 1000);
    }
}
