//! # Escrow Configuration
//!
//! Tunables of the escrow contract. Defaults reproduce the production
//! deployment: names up to 100 bytes, `hive` and `hbd` accepted, and votes
//! revisable until the escrow closes.
//!
//! Configuration is read from YAML and then overridden from the
//! environment:
//!
//! | Variable | Field |
//! |---|---|
//! | `ARBITRA_MAX_NAME_LENGTH` | `max_name_length` |
//! | `ARBITRA_VOTE_POLICY` | `vote_policy` (`revisable` or `final_once_cast`) |

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use arbitra_core::Asset;

/// Default maximum escrow name length in bytes.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 100;

/// Whether a role may change its vote while the escrow is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotePolicy {
    /// A role may overwrite its vote any number of times before close.
    #[default]
    Revisable,
    /// A role's first vote is final.
    FinalOnceCast,
}

impl VotePolicy {
    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revisable => "revisable",
            Self::FinalOnceCast => "final_once_cast",
        }
    }
}

impl std::str::FromStr for VotePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "revisable" => Ok(Self::Revisable),
            "final_once_cast" => Ok(Self::FinalOnceCast),
            other => Err(ConfigError::InvalidValue {
                key: "vote_policy".to_string(),
                value: other.to_string(),
                reason: "expected revisable or final_once_cast".to_string(),
            }),
        }
    }
}

/// Errors while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`EscrowConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value was syntactically valid but not acceptable.
    #[error("invalid config value for {key}: \"{value}\" ({reason})")]
    InvalidValue {
        /// Field or variable name.
        key: String,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Contract configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EscrowConfig {
    /// Maximum escrow name length in bytes.
    pub max_name_length: usize,
    /// Assets accepted in `transfer.allow` intents.
    pub supported_assets: Vec<Asset>,
    /// Vote revision policy.
    pub vote_policy: VotePolicy,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            supported_assets: Asset::ALL.to_vec(),
            vote_policy: VotePolicy::default(),
        }
    }
}

impl EscrowConfig {
    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = lookup("ARBITRA_MAX_NAME_LENGTH") {
            self.max_name_length = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ARBITRA_MAX_NAME_LENGTH".to_string(),
                value: raw.clone(),
                reason: "expected an unsigned integer".to_string(),
            })?;
        }
        if let Some(raw) = lookup("ARBITRA_VOTE_POLICY") {
            self.vote_policy = raw.parse()?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject configurations the contract cannot operate under.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_name_length == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_name_length".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.supported_assets.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "supported_assets".to_string(),
                value: "[]".to_string(),
                reason: "at least one asset is required".to_string(),
            });
        }
        Ok(())
    }
}
