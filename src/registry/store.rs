// src/registry/store.rs
// Persistence for the DocKey -> document id mapping

use crate::error::ClipError;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Get-all on load, set-all on change
pub trait RegistryStore: Send + Sync {
    fn load(&self) -> Result<HashMap<String, String>, ClipError>;
    fn save(&self, mapping: &HashMap<String, String>) -> Result<(), ClipError>;
}

/// Pretty-printed JSON object at a fixed path
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl RegistryStore for JsonFileStore {
    fn load(&self) -> Result<HashMap<String, String>, ClipError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let raw = fs::read_to_string(&self.path)
            .map_err(|e| ClipError::Store(format!("read {}: {}", self.path.display(), e)))?;

        match serde_json::from_str(&raw) {
            Ok(mapping) => Ok(mapping),
            Err(e) => {
                let backup = self.path.with_extension("json.bak");
                let _ = fs::copy(&self.path, &backup);
                tracing::warn!(
                    "Registry {} is invalid ({}), backed up to {}; starting empty",
                    self.path.display(),
                    e,
                    backup.display()
                );
                Ok(HashMap::new())
            }
        }
    }

    fn save(&self, mapping: &HashMap<String, String>) -> Result<(), ClipError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ClipError::Store(format!("create {}: {}", parent.display(), e)))?;
        }

        let json = serde_json::to_string_pretty(mapping)
            .map_err(|e| ClipError::Store(e.to_string()))?;
        fs::write(&self.path, json)
            .map_err(|e| ClipError::Store(format!("write {}: {}", self.path.display(), e)))
    }
}
