use crate::error::{ClipforgeError, Result};
use crate::operation::Operation;
use crate::paths::validate_name;
use crate::store::{Store, KEY_PERSISTED};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// User-named, persisted operation sequences, kept under the store's
/// `persisted` key. Last write for a given name wins.
#[derive(Debug, Clone, Default)]
pub struct Presets {
    map: BTreeMap<String, Vec<Operation>>,
}

impl Presets {
    pub fn load(store: &Store) -> Self {
        Self {
            map: store.get(KEY_PERSISTED).unwrap_or_default(),
        }
    }

    pub fn save(&self, store: &mut Store) -> Result<()> {
        store.set(KEY_PERSISTED, &self.map)
    }

    pub fn insert(&mut self, name: &str, operations: Vec<Operation>) -> Result<()> {
        validate_name(name)?;
        self.map.insert(name.to_string(), operations);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<()> {
        self.map
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ClipforgeError::PresetNotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Result<&[Operation]> {
        self.map
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ClipforgeError::PresetNotFound(name.to_string()))
    }

    /// Preset names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
