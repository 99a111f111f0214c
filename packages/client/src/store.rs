//! Persistence for the rename counter and the assigned-to-original table.
//!
//! The [`NameStore`] port keeps the rename logic independent of where the
//! names actually live. [`JsonNameStore`] is the durable implementation; it
//! keeps the legacy `modCounter` / `modMappings` keys so existing state files
//! stay readable.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Persistence port used by the rename step.
///
/// Mappings are append-only; nothing in the workflow ever removes one, so an
/// assigned name stays resolvable for as long as the store file exists.
pub trait NameStore {
    fn counter(&self) -> Result<u64>;
    fn set_counter(&mut self, value: u64) -> Result<()>;
    /// Original filename for an assigned name, if one was recorded.
    fn original_name(&self, assigned: &str) -> Result<Option<String>>;
    fn record_mapping(&mut self, assigned: &str, original: &str) -> Result<()>;
    fn mappings(&self) -> Result<BTreeMap<String, String>>;
}

/// Volatile store for tests and one-off runs.
#[derive(Debug, Default)]
pub struct MemoryNameStore {
    counter: u64,
    mappings: BTreeMap<String, String>,
}

impl NameStore for MemoryNameStore {
    fn counter(&self) -> Result<u64> {
        Ok(self.counter)
    }

    fn set_counter(&mut self, value: u64) -> Result<()> {
        self.counter = value;
        Ok(())
    }

    fn original_name(&self, assigned: &str) -> Result<Option<String>> {
        Ok(self.mappings.get(assigned).cloned())
    }

    fn record_mapping(&mut self, assigned: &str, original: &str) -> Result<()> {
        self.mappings
            .insert(assigned.to_string(), original.to_string());
        Ok(())
    }

    fn mappings(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.mappings.clone())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedNames {
    #[serde(rename = "modCounter", default)]
    counter: u64,
    #[serde(rename = "modMappings", default)]
    mappings: BTreeMap<String, String>,
}

/// Name store backed by a single JSON file.
///
/// Each operation reads or rewrites the whole file. The write is not atomic;
/// a single client process per state file is assumed.
#[derive(Debug, Clone)]
pub struct JsonNameStore {
    path: PathBuf,
}

impl JsonNameStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn load(&self) -> Result<PersistedNames> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PersistedNames::default());
            }
            Err(e) => return Err(ClientError::Store(format!("read {}: {e}", self.path.display()))),
        };
        serde_json::from_str(&text)
            .map_err(|e| ClientError::Store(format!("parse {}: {e}", self.path.display())))
    }

    fn save(&self, names: &PersistedNames) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Store(format!("create {}: {e}", parent.display())))?;
        }
        let text = serde_json::to_string_pretty(names)
            .map_err(|e| ClientError::Store(format!("serialize names: {e}")))?;
        std::fs::write(&self.path, text)
            .map_err(|e| ClientError::Store(format!("write {}: {e}", self.path.display())))
    }
}

impl NameStore for JsonNameStore {
    fn counter(&self) -> Result<u64> {
        Ok(self.load()?.counter)
    }

    fn set_counter(&mut self, value: u64) -> Result<()> {
        let mut names = self.load()?;
        names.counter = value;
        self.save(&names)
    }

    fn original_name(&self, assigned: &str) -> Result<Option<String>> {
        Ok(self.load()?.mappings.get(assigned).cloned())
    }

    fn record_mapping(&mut self, assigned: &str, original: &str) -> Result<()> {
        let mut names = self.load()?;
        names
            .mappings
            .insert(assigned.to_string(), original.to_string());
        self.save(&names)
    }

    fn mappings(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.load()?.mappings)
    }
}
