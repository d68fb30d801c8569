//! Save data for progress that survives between sessions
//!
//! Progress is a flat map of scalar values keyed by string identifiers,
//! stored on disk as RON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A single saved value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SaveValue {
    Int(i64),
    Float(f32),
    Bool(bool),
}

/// Key-value store for saved progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveStore {
    values: BTreeMap<String, SaveValue>,
}

impl SaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) {
        self.values.insert(key.into(), SaveValue::Int(value));
    }

    pub fn set_float(&mut self, key: impl Into<String>, value: f32) {
        self.values.insert(key.into(), SaveValue::Float(value));
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.values.insert(key.into(), SaveValue::Bool(value));
    }

    /// Integer value, or `default` when missing or stored with another type
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(SaveValue::Int(value)) => *value,
            _ => default,
        }
    }

    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.values.get(key) {
            Some(SaveValue::Float(value)) => *value,
            Some(SaveValue::Int(value)) => *value as f32,
            _ => default,
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(SaveValue::Bool(value)) => *value,
            Some(SaveValue::Int(value)) => *value == 1,
            _ => default,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize save data")
    }

    pub fn from_ron(contents: &str) -> Result<Self> {
        ron::from_str(contents).context("Failed to parse save data")
    }

    /// Write the store to `path`, replacing any previous save
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let contents = self.to_ron()?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write save file '{}'", path.display()))
    }

    /// Read a store from `path`. A missing file is a fresh start, not an error.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read save file '{}'", path.display()))?;
        Self::from_ron(&contents).with_context(|| format!("Corrupt save file '{}'", path.display()))
    }
}

/// Something whose progress is written to and restored from a `SaveStore`
pub trait Persist {
    fn save(&self, store: &mut SaveStore);
    fn load(&mut self, store: &SaveStore);
}
