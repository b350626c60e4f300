use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

use log::{debug, warn};

use super::Card;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid store key: {0:?} (must match [A-Za-z0-9_-]+)")]
    InvalidKey(String),
}

/// A string-valued key-value store holding whole serialized values.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`. `Ok(None)` means absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Overwrite the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Validate that a key is safe for use as a file stem.
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty()
        || !key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
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

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, value)?;
        Ok(())
    }
}

/// In-process store. Nothing survives the process.
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
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Converts the card collection to and from one value of a [`KeyValueStore`].
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the collection.
    ///
    /// Absent, unreadable, or undecodable values all yield an empty collection.
    /// A corrupt value is left in place; it is only replaced by the next save.
    pub fn load(&self) -> Vec<Card> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=store_load status=absent key={}", self.key);
                return Vec::new();
            }
            Err(e) => {
                warn!("event=store_load status=unreadable key={} error={e}", self.key);
                return Vec::new();
            }
        };
        match decode(&raw) {
            Ok(cards) => {
                debug!("event=store_load status=ok key={} cards={}", self.key, cards.len());
                cards
            }
            Err(e) => {
                warn!("event=store_load status=corrupt key={} error={e}", self.key);
                Vec::new()
            }
        }
    }

    /// Overwrite the stored value with the full collection.
    pub fn save(&mut self, cards: &[Card]) -> Result<(), StorageError> {
        let value = encode(cards)?;
        self.store.set(&self.key, &value)?;
        debug!("event=store_save status=ok key={} cards={}", self.key, cards.len());
        Ok(())
    }
}

/// Serialize the collection as a JSON array of `{id, text}` records.
fn encode(cards: &[Card]) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(cards)?)
}

/// Parse a stored value. Later records repeating an earlier id are dropped.
fn decode(raw: &str) -> Result<Vec<Card>, StorageError> {
    let cards: Vec<Card> = serde_json::from_str(raw)?;
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(cards.len());
    for card in cards {
        if seen.insert(card.id.clone()) {
            out.push(card);
        } else {
            warn!("event=store_load status=duplicate_id id={}", card.id);
        }
    }
    Ok(out)
}
