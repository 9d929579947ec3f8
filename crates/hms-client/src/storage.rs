//! Durable session storage.
//!
//! # Purpose
//! A small key/value surface the session store persists itself through.
//! Exactly three keys are used; everything else about the session is
//! derived from them on hydration.
//!
//! # Key invariants
//! - Writes land before the corresponding in-memory transition is
//!   observable, so a process restart never sees a half-written session.
//! - `FileStorage` rewrites the whole file on every mutation; the file is
//!   a flat JSON object of string values.
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Bearer token for the `Authorization` header.
pub const KEY_TOKEN: &str = "token";
/// JSON-encoded identity of the signed-in user.
pub const KEY_USER: &str = "user";
/// `"true"` / `"false"`; present only while a student session is live.
pub const KEY_IS_MONITOR: &str = "isMonitor";

pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
        Ok(())
    }
}

/// File-backed storage: one JSON object, rewritten whole on each change.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("parse session file: {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("read session file: {}", path.display()));
            }
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create session dir: {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(entries).context("encode session file")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("write session file: {}", self.path.display()))
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trips_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        {
            let storage = FileStorage::open(&path).expect("open");
            storage.set(KEY_TOKEN, "tok-1").expect("set");
            storage.set(KEY_IS_MONITOR, "true").expect("set");
        }
        let storage = FileStorage::open(&path).expect("reopen");
        assert_eq!(storage.get(KEY_TOKEN).as_deref(), Some("tok-1"));
        assert_eq!(storage.get(KEY_IS_MONITOR).as_deref(), Some("true"));
        storage.remove(KEY_TOKEN).expect("remove");
        let storage = FileStorage::open(&path).expect("reopen again");
        assert_eq!(storage.get(KEY_TOKEN), None);
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::open(dir.path().join("absent.json")).expect("open");
        assert_eq!(storage.get(KEY_TOKEN), None);
    }

    #[test]
    fn remove_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.remove(KEY_USER).expect("remove absent");
        storage.set(KEY_USER, "{}").expect("set");
        storage.remove(KEY_USER).expect("remove");
        storage.remove(KEY_USER).expect("remove again");
        assert_eq!(storage.get(KEY_USER), None);
    }
}
