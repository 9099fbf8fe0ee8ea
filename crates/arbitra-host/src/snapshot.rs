//! # Host Snapshots
//!
//! A [`HostSnapshot`] captures the full host state (every store entry and
//! every custody balance) as JSON so that a short-lived process such as the
//! CLI can resume where the previous invocation stopped.
//!
//! Snapshots are written to a sibling `.tmp` file and renamed into place, so
//! a crash mid-write leaves the previous snapshot intact.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::custody::MemoryCustody;
use crate::error::StoreError;
use crate::store::MemoryStore;

/// Serializable host state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSnapshot {
    /// Key-value store contents.
    #[serde(default)]
    pub store: BTreeMap<String, String>,
    /// Custody balances.
    #[serde(default)]
    pub custody: MemoryCustody,
}

impl HostSnapshot {
    /// Capture a store and a custody ledger.
    pub fn capture(store: &MemoryStore, custody: &MemoryCustody) -> Self {
        Self {
            store: store.entries(),
            custody: custody.clone(),
        }
    }

    /// Split into live host components.
    pub fn into_parts(self) -> (MemoryStore, MemoryCustody) {
        (MemoryStore::from_entries(self.store), self.custody)
    }

    /// Load a snapshot from `path`. A missing file yields an empty snapshot.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no snapshot, starting empty");
                Ok(Self::default())
            }
            Err(source) => Err(StoreError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Write the snapshot to `path`, replacing any previous file.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("tmp");
        let io_err = |source| StoreError::Io {
            path: path.display().to_string(),
            source,
        };
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)?;
        tracing::debug!(path = %path.display(), keys = self.store.len(), "snapshot saved");
        Ok(())
    }
}
