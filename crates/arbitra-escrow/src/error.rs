//! # Escrow Error Types
//!
//! Every failure aborts the whole call. No error is retried internally and
//! no write of a failed call is persisted.
//!
//! | Variant | Meaning |
//! |---|---|
//! | `Validation` | malformed input or a bad participant configuration |
//! | `NotFound` | unknown escrow id |
//! | `NotAParty` | decision from an address that holds no role |
//! | `AlreadyClosed` | decision on a sealed escrow, even a matching one |
//! | `VoteAlreadyCast` | second vote by a role under `final_once_cast` |
//! | `CorruptState` | persisted data does not decode to a valid record |
//! | `DrawFailed` | the creator's funds could not be locked |
//! | `CustodyTransferFailed` | the payout at close could not be made |
//!
//! `CorruptState` is never repaired.

use thiserror::Error;

use arbitra_core::{EscrowId, ValidationError};
use arbitra_host::{CustodyError, StoreError};

use crate::ledger::{Decision, Role};
use crate::record::Outcome;

/// Errors arising from escrow operations.
#[derive(Error, Debug)]
pub enum EscrowError {
    /// The request was rejected before touching any state.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No escrow exists with this identifier.
    #[error("escrow {escrow_id} not found")]
    NotFound {
        /// The requested identifier.
        escrow_id: EscrowId,
    },

    /// The caller holds no role on the escrow.
    #[error("{address} is not a party to escrow {escrow_id}")]
    NotAParty {
        /// The escrow identifier.
        escrow_id: EscrowId,
        /// The caller's address.
        address: String,
    },

    /// The escrow is sealed and accepts no further decisions.
    #[error("escrow {escrow_id} already closed with outcome {outcome}")]
    AlreadyClosed {
        /// The escrow identifier.
        escrow_id: EscrowId,
        /// The sealed outcome.
        outcome: Outcome,
    },

    /// The role already voted and the vote policy makes votes final.
    #[error("{role} already decided {decision} on escrow {escrow_id}")]
    VoteAlreadyCast {
        /// The escrow identifier.
        escrow_id: EscrowId,
        /// The caller's role.
        role: Role,
        /// The vote on record.
        decision: Decision,
    },

    /// Persisted data failed to decode into a well-formed record.
    #[error("corrupt state at key {key}: {reason}")]
    CorruptState {
        /// The store key holding the bad data.
        key: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The creator's funds could not be locked at creation.
    #[error("failed to lock escrow funds: {0}")]
    DrawFailed(#[source] CustodyError),

    /// The closing payout could not be made. The escrow stays open.
    #[error("custody transfer for escrow {escrow_id} failed: {source}")]
    CustodyTransferFailed {
        /// The escrow identifier.
        escrow_id: EscrowId,
        /// The failure reported by the custody primitive.
        #[source]
        source: CustodyError,
    },

    /// A record already exists at a freshly allocated identifier.
    #[error("escrow {escrow_id} already exists")]
    DuplicateCreation {
        /// The colliding identifier.
        escrow_id: EscrowId,
    },

    /// Resolution was requested for an escrow that is still open.
    #[error("escrow {escrow_id} is not closed; custody cannot be resolved")]
    NotClosed {
        /// The escrow identifier.
        escrow_id: EscrowId,
    },

    /// The persistence layer failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Stable, payload-free classification of an [`EscrowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`EscrowError::Validation`].
    Validation,
    /// See [`EscrowError::NotFound`].
    NotFound,
    /// See [`EscrowError::NotAParty`].
    NotAParty,
    /// See [`EscrowError::AlreadyClosed`].
    AlreadyClosed,
    /// See [`EscrowError::VoteAlreadyCast`].
    VoteAlreadyCast,
    /// See [`EscrowError::CorruptState`].
    CorruptState,
    /// See [`EscrowError::DrawFailed`].
    DrawFailed,
    /// See [`EscrowError::CustodyTransferFailed`].
    CustodyTransferFailed,
    /// See [`EscrowError::DuplicateCreation`].
    DuplicateCreation,
    /// See [`EscrowError::NotClosed`].
    NotClosed,
    /// See [`EscrowError::Storage`].
    Storage,
}

impl EscrowError {
    /// Build a [`EscrowError::CorruptState`].
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptState {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// The classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotAParty { .. } => ErrorKind::NotAParty,
            Self::AlreadyClosed { .. } => ErrorKind::AlreadyClosed,
            Self::VoteAlreadyCast { .. } => ErrorKind::VoteAlreadyCast,
            Self::CorruptState { .. } => ErrorKind::CorruptState,
            Self::DrawFailed(_) => ErrorKind::DrawFailed,
            Self::CustodyTransferFailed { .. } => ErrorKind::CustodyTransferFailed,
            Self::DuplicateCreation { .. } => ErrorKind::DuplicateCreation,
            Self::NotClosed { .. } => ErrorKind::NotClosed,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Whether the error indicates damaged state or lost custody guarantees
    /// rather than a rejected request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::CorruptState | ErrorKind::CustodyTransferFailed | ErrorKind::Storage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbitra_core::{Amount, Asset};

    #[test]
    fn not_a_party_display() {
        let err = EscrowError::NotAParty {
            escrow_id: EscrowId::new(3),
            address: "hive:stranger".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("hive:stranger"));
        assert!(msg.contains("escrow 3"));
        assert_eq!(err.kind(), ErrorKind::NotAParty);
        assert!(!err.is_fatal());
    }

    #[test]
    fn already_closed_display_includes_outcome() {
        let err = EscrowError::AlreadyClosed {
            escrow_id: EscrowId::new(0),
            outcome: Outcome::Release,
        };
        assert!(format!("{err}").contains("release"));
    }

    #[test]
    fn corrupt_state_is_fatal() {
        let err = EscrowError::corrupt("e:0|d", "invalid decision byte");
        assert_eq!(err.kind(), ErrorKind::CorruptState);
        assert!(err.is_fatal());
        assert!(format!("{err}").contains("e:0|d"));
    }

    #[test]
    fn custody_transfer_failed_keeps_source() {
        let err = EscrowError::CustodyTransferFailed {
            escrow_id: EscrowId::new(1),
            source: CustodyError::InsufficientFunds {
                account: "vault".to_string(),
                asset: Asset::Hive,
                available: Amount::ZERO,
                requested: Amount::from_millis(1_000),
            },
        };
        assert!(err.is_fatal());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn validation_converts_via_from() {
        let err: EscrowError = ValidationError::NameRequired.into();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
