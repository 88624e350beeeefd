use crate::{StoreConfig, StoreError};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Small persistent key-value store backed by a single JSON object on disk.
///
/// A missing or unreadable file reads as an empty store. Writes replace the
/// file through a sibling temp file and a rename.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { path: config.path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read_all().remove(key)
    }

    pub fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.read_all();
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }

    /// Returns whether the key was present
    pub fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.read_all();
        if entries.remove(key).is_none() {
            return Ok(false);
        }
        self.write_all(&entries)?;
        Ok(true)
    }

    fn read_all(&self) -> Map<String, Value> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                warn!("Failed to read store {}: {}", self.path.display(), e);
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(entries)) => entries,
            Ok(_) => {
                warn!("Store {} is not a JSON object, ignoring it", self.path.display());
                Map::new()
            }
            Err(e) => {
                warn!("Store {} is corrupted, ignoring it: {}", self.path.display(), e);
                Map::new()
            }
        }
    }

    fn write_all(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Wrote {} keys to {}", entries.len(), self.path.display());
        Ok(())
    }
}
