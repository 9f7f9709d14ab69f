use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::types::{ExperimentLog, LOG_VERSION};

pub const LOG_KEY: &str = "experiment-log";

/// Minimal persistence interface. Keys are plain names; values are opaque
/// strings (JSON in practice).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory. Writes are atomic.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("Failed to create data directory at {}", self.dir.display()))?;
        }

        let path = self.path_for(key);
        let mut file = AtomicWriteFile::open(&path)
            .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
        file.write_all(value.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        file.commit()
            .with_context(|| format!("Failed to save {}", path.display()))?;
        Ok(())
    }
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Load the experiment log.
///
/// A missing entry is a new empty log. An entry with an unsupported
/// version is an error.
pub fn load_log(store: &dyn KeyValueStore) -> Result<ExperimentLog> {
    let Some(json) = store.get(LOG_KEY)? else {
        return Ok(ExperimentLog::new());
    };

    let log: ExperimentLog = serde_json::from_str(&json).context("Failed to load experiment log")?;

    if log.version != LOG_VERSION {
        anyhow::bail!("Unsupported experiment log version: {}", log.version);
    }

    Ok(log)
}

pub fn save_log(store: &mut dyn KeyValueStore, log: &ExperimentLog) -> Result<()> {
    let json = serde_json::to_string_pretty(log).context("Failed to serialize experiment log")?;
    store.set(LOG_KEY, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_load_missing_returns_empty() {
        let store = MemoryStore::new();
        let log = load_log(&store).unwrap();
        assert_eq!(log, ExperimentLog::new());
    }

    #[test]
    fn test_memory_roundtrip() {
        let mut store = MemoryStore::new();
        let mut log = ExperimentLog::new();
        log.start("Tuesday uploads".into(), "More first-day views".into(), None, Utc::now());

        save_log(&mut store, &log).unwrap();
        assert_eq!(load_log(&store).unwrap(), log);
    }

    #[test]
    fn test_unsupported_version() {
        let mut store = MemoryStore::new();
        store.set(LOG_KEY, r#"{"version": 2, "entries": []}"#).unwrap();
        let err = load_log(&store).unwrap_err();
        assert!(err.to_string().contains("Unsupported experiment log version: 2"));
    }

    #[test]
    fn test_corrupt_log() {
        let mut store = MemoryStore::new();
        store.set(LOG_KEY, "not json").unwrap();
        assert!(load_log(&store).is_err());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        // Nested path that does not exist yet
        let mut store = FileStore::new(dir.path().join("data"));

        assert!(store.get("anything").unwrap().is_none());

        let mut log = ExperimentLog::new();
        log.start("Face thumbnails".into(), "CTR up".into(), Some("v1".into()), Utc::now());
        save_log(&mut store, &log).unwrap();

        assert!(store.path_for(LOG_KEY).exists());
        assert_eq!(load_log(&store).unwrap(), log);
    }

    #[test]
    fn test_file_store_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf());
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }
}
