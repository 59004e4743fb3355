//! Durable storage for the primary chat session.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::message::ChatMessage;

/// Key-value storage for whole message lists.
///
/// Every save replaces what is stored under the key.
pub trait SessionStore: Send + Sync {
    /// Load the list stored under `key`, or `None` if nothing is stored.
    fn load(&self, key: &str) -> Result<Option<Vec<ChatMessage>>>;

    fn save(&self, key: &str, messages: &[ChatMessage]) -> Result<()>;
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn load(&self, key: &str) -> Result<Option<Vec<ChatMessage>>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, messages: &[ChatMessage]) -> Result<()> {
        (**self).save(key, messages)
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SessionStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<Vec<ChatMessage>>> {
        let raw = match fs::read(self.path(key)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    fn save(&self, key: &str, messages: &[ChatMessage]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Replace atomically.
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(messages)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Vec<ChatMessage>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// What is currently stored under `key`.
    pub fn get(&self, key: &str) -> Option<Vec<ChatMessage>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<ChatMessage>>> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, messages: &[ChatMessage]) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), messages.to_vec());
        Ok(())
    }
}
