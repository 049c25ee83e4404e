use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Key-value blob store: named string keys mapping to JSON values.
///
/// File-backed stores hold a single JSON object on disk and rewrite it
/// on every mutation; a missing file is an empty store. The in-memory
/// variant backs tests and throwaway sessions.
pub struct Storage {
    path: Option<PathBuf>,
    entries: Mutex<HashMap<String, Value>>,
}

impl Storage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read store at {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("store at {} is not valid JSON", path.display()))?
        } else {
            HashMap::new()
        };

        debug!(store = %path.display(), "opened store");
        Ok(Self {
            path: Some(path),
            entries: Mutex::new(entries),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(value) => {
                let parsed = serde_json::from_value(value.clone())
                    .with_context(|| format!("malformed value under key '{key}'"))?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), serde_json::to_value(value)?);
        self.flush(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        self.flush(&entries)
    }

    fn flush(&self, entries: &HashMap<String, Value>) -> Result<()> {
        if let Some(path) = &self.path {
            let raw = serde_json::to_string_pretty(entries)?;
            std::fs::write(path, raw)
                .with_context(|| format!("failed to write store at {}", path.display()))?;
            debug!(store = %path.display(), "flushed store");
        }
        Ok(())
    }
}
