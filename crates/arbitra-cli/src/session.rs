//! # Session
//!
//! Binds one CLI invocation to its configuration and host snapshot.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use arbitra_escrow::{EscrowConfig, EscrowContract};
use arbitra_host::{HostSnapshot, MemoryCustody, MemoryStore};

/// The contract type driven by the CLI.
pub type CliContract = EscrowContract<MemoryStore, MemoryCustody>;

/// Configuration and state location of one invocation.
#[derive(Debug, Clone)]
pub struct Session {
    state_path: PathBuf,
    config: EscrowConfig,
}

impl Session {
    /// A session over the snapshot at `state_path`.
    pub fn new(state_path: PathBuf, config: EscrowConfig) -> Self {
        Self { state_path, config }
    }

    /// Location of the snapshot.
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Rebuild the contract from the snapshot. A missing snapshot starts
    /// from an empty host.
    pub fn open(&self) -> Result<CliContract> {
        let snapshot = HostSnapshot::load(&self.state_path).with_context(|| {
            format!("failed to load state from {}", self.state_path.display())
        })?;
        let (store, custody) = snapshot.into_parts();
        Ok(EscrowContract::new(store, custody, self.config.clone()))
    }

    /// Write the contract's host state back to the snapshot.
    pub fn persist(&self, contract: CliContract) -> Result<()> {
        let (store, custody) = contract.into_parts();
        HostSnapshot::capture(&store, &custody)
            .save(&self.state_path)
            .with_context(|| format!("failed to save state to {}", self.state_path.display()))
    }
}

/// Load the escrow configuration: the YAML file if given, otherwise the
/// defaults, then environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<EscrowConfig> {
    let base = match path {
        Some(p) => EscrowConfig::from_yaml_file(p)
            .with_context(|| format!("failed to load config {}", p.display()))?,
        None => EscrowConfig::default(),
    };
    base.apply_env().context("invalid environment override")
}
