//! Persisted key-value storage for table view state.
//!
//! The table components never talk to a database directly. They go through
//! a [`KeyValueStore`], which wraps a byte-oriented [`StoreBackend`] with
//! typed JSON serialization and change notifications. Backends:
//!
//! - [`SqliteBackend`] — durable storage, survives restarts
//! - [`MemoryBackend`] — volatile storage for tests and headless use
//!
//! Access is synchronous: the store is read and written on the UI thread.
//! Two components writing the same key race on last-write-wins semantics.

mod columns;
mod date_range;
mod memory;
pub mod paths;
mod sqlite;

pub use columns::{ColumnVisibilityStore, VisibilityMap};
pub use date_range::{DateRange, DateRangeStore};
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Store error type.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(serde_json::Error),
    #[error("deserialization error: {0}")]
    Deserialization(serde_json::Error),
    #[error("no platform data directory available")]
    Unavailable,
}

/// Backend trait for raw byte storage.
///
/// Implementations handle storage and retrieval of opaque values; the
/// [`KeyValueStore`] wraps this with typed serialization.
pub trait StoreBackend: Send + Sync {
    /// Get raw bytes for a key.
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Set raw bytes for a key.
    fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Delete a key.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Get all keys matching a prefix.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

type Listener = Arc<dyn Fn(&str) + Send + Sync>;

/// Typed key-value store.
///
/// Wraps a [`StoreBackend`] with JSON serialization and a subscriber list.
/// Cloning is cheap; clones share the backend and the subscribers.
#[derive(Clone)]
pub struct KeyValueStore {
    backend: Arc<dyn StoreBackend>,
    listeners: Arc<RwLock<Vec<Listener>>>,
}

impl KeyValueStore {
    /// Create a store over the given backend.
    pub fn new(backend: impl StoreBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
            listeners: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Open the default durable store in the platform data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        let path = paths::store_db().ok_or(StoreError::Unavailable)?;
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        Ok(Self::new(SqliteBackend::new(path)?))
    }

    /// Create a volatile in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Get a typed value for a key.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.get_bytes(key)? {
            Some(bytes) => Ok(Some(
                serde_json::from_slice(&bytes).map_err(StoreError::Deserialization)?,
            )),
            None => Ok(None),
        }
    }

    /// Get a typed value for a key, returning a default if not found.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, StoreError> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Set a typed value for a key and notify subscribers.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value).map_err(StoreError::Serialization)?;
        self.backend.set_bytes(key, bytes)?;
        self.notify(key);
        Ok(())
    }

    /// Delete a key and notify subscribers.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.backend.delete(key)?;
        self.notify(key);
        Ok(())
    }

    /// Get all keys matching a prefix.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.backend.keys_with_prefix(prefix)
    }

    /// Subscribe to changes. The listener receives the changed key after
    /// every successful write through this store (or any clone of it).
    pub fn subscribe(&self, listener: impl Fn(&str) + Send + Sync + 'static) {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push(Arc::new(listener));
        }
    }

    fn notify(&self, key: &str) {
        if let Ok(listeners) = self.listeners.read() {
            for listener in listeners.iter() {
                listener(key);
            }
        }
    }
}

impl std::fmt::Debug for KeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyValueStore").finish_non_exhaustive()
    }
}
