//! # Key-Value Store
//!
//! The persistence substrate is a flat map from string keys to string
//! values. Reads observe every write made earlier in the same call.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::StoreError;

/// Flat string-keyed persistence.
pub trait KvStore {
    /// Read the value stored at `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored at `key`.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    /// Apply a batch of writes in order.
    fn apply(&mut self, writes: Vec<(String, String)>) -> Result<(), StoreError> {
        for (key, value) in writes {
            self.set(&key, value)?;
        }
        Ok(())
    }
}

/// Thread-safe, cloneable in-memory store.
///
/// Clones share the same underlying map. The lock is `parking_lot` and is
/// never held across calls into other components.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    data: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        Self {
            data: Arc::new(RwLock::new(entries)),
        }
    }

    /// Copy out every entry, ordered by key.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.data.read().clone()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        tracing::trace!(key, "store set");
        self.data.write().insert(key.to_string(), value);
        Ok(())
    }

    fn apply(&mut self, writes: Vec<(String, String)>) -> Result<(), StoreError> {
        // One write lock for the whole batch.
        let mut guard = self.data.write();
        for (key, value) in writes {
            guard.insert(key, value);
        }
        Ok(())
    }
}
