//! # Identity Newtypes
//!
//! Identifiers used throughout the escrow stack. Each is a distinct type.
//!
//! - [`Address`] is an opaque, non-empty party address. Comparison is exact
//!   byte equality: no case folding, no prefix matching.
//! - [`EscrowId`] is the sequential escrow number handed out by the registry.
//! - [`TxId`] is the host-supplied transaction reference of the current call.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An account address of an escrow party.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create an address, rejecting the empty string.
    ///
    /// `field` names the slot being validated and is echoed in the error.
    pub fn parse(value: impl Into<String>, field: &str) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::EmptyAddress {
                field: field.to_string(),
            });
        }
        Ok(Self(value))
    }

    /// Access the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sequential identifier of an escrow.
///
/// Assigned once by the registry, never reused, strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EscrowId(u64);

impl EscrowId {
    /// The first identifier handed out by an empty registry.
    pub const FIRST: EscrowId = EscrowId(0);

    /// Wrap a raw identifier.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw numeric value.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The identifier following this one, or `None` on overflow.
    pub fn checked_next(&self) -> Option<EscrowId> {
        self.0.checked_add(1).map(EscrowId)
    }
}

impl std::fmt::Display for EscrowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EscrowId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // u64::from_str accepts a leading '+', which is not a valid id.
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidEscrowId(s.to_string()));
        }
        s.parse::<u64>()
            .map(EscrowId)
            .map_err(|_| ValidationError::InvalidEscrowId(s.to_string()))
    }
}

/// Reference to the host transaction that carried a call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    /// Wrap a host transaction reference.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
