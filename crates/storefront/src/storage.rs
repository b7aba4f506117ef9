//! Local key-value storage for the persisted cart.
//!
//! The cart is mirrored as a JSON array under a single key. Reads happen
//! once at startup; writes happen after every cart mutation. Storage I/O is
//! synchronous.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use green_cart_core::CartLineItem;
use thiserror::Error;

/// Errors from the local key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored value could not be encoded or decoded.
    #[error("Storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The stored value decoded to something other than a cart.
    #[error("Stored value under {0} is not a cart")]
    NotACart(String),
}

/// A persistent string key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

// =============================================================================
// File-backed store
// =============================================================================

/// Key-value store keeping one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Volatile key-value store, for tests and previews.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
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

// =============================================================================
// Cart storage adapter
// =============================================================================

/// Reads and writes the cart under a fixed key.
pub struct CartStorage {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl CartStorage {
    /// Wrap a key-value store, persisting the cart under `key`.
    pub fn new(store: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        Self {
            store: Box::new(store),
            key: key.into(),
        }
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored cart. An absent value is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or the stored value
    /// is not a JSON array of line items.
    pub fn load(&self) -> Result<Vec<CartLineItem>, StorageError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        if !value.is_array() {
            return Err(StorageError::NotACart(self.key.clone()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Write the whole cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be encoded or written.
    pub fn save(&mut self, items: &[CartLineItem]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        self.store.set(&self.key, &raw)
    }
}

impl std::fmt::Debug for CartStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStorage").field("key", &self.key).finish_non_exhaustive()
    }
}
