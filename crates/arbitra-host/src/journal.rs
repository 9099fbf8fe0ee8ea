//! # Write Journal
//!
//! A [`Journal`] sits between a call and the persistent store. Reads fall
//! through to the base store unless the call already staged a write for the
//! key; writes are buffered. When the call succeeds the buffered writes are
//! taken with [`Journal::into_writes`] and applied to the store in one batch.
//! When it fails the journal is dropped and the store is untouched.

use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::store::KvStore;

/// Staged writes layered over a read-only view of a store.
#[derive(Debug)]
pub struct Journal<'a, S: KvStore + ?Sized> {
    base: &'a S,
    pending: BTreeMap<String, String>,
}

impl<'a, S: KvStore + ?Sized> Journal<'a, S> {
    /// Open an empty journal over `base`.
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            pending: BTreeMap::new(),
        }
    }

    /// Number of distinct keys staged so far.
    pub fn staged(&self) -> usize {
        self.pending.len()
    }

    /// Consume the journal, yielding the staged writes ordered by key.
    pub fn into_writes(self) -> Vec<(String, String)> {
        self.pending.into_iter().collect()
    }
}

impl<S: KvStore + ?Sized> KvStore for Journal<'_, S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.pending.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => self.base.get(key),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.pending.insert(key.to_string(), value);
        Ok(())
    }
}
