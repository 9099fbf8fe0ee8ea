//! # Validation Errors
//!
//! Structured rejection reasons for malformed input, built with `thiserror`.
//! Each variant carries the offending value and, where useful, the expected
//! format, so a caller can correct the request without reading logs.
//!
//! Validation errors are never retried and never accompany a state change:
//! every request that produces one is rejected before anything is persisted
//! or any funds move.

use thiserror::Error;

/// Rejection of a primitive value or of a request's structure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A payload did not have the expected shape.
    #[error("malformed payload: expected {expected} ({reason})")]
    MalformedPayload {
        /// Description of the expected layout, e.g. `Name|To|Arbitrator`.
        expected: String,
        /// What was wrong with the input.
        reason: String,
    },

    /// An address was empty.
    #[error("invalid address: {field} must be non-empty")]
    EmptyAddress {
        /// Which party slot was empty (`receiver`, `arbitrator`, `sender`).
        field: String,
    },

    /// An escrow identifier was missing or not an unsigned decimal.
    #[error("invalid escrow id: \"{0}\" (expected an unsigned decimal number)")]
    InvalidEscrowId(String),

    /// A decision token was not one of the accepted spellings.
    #[error("invalid decision: \"{0}\" (expected release/true/1 or refund/false/0)")]
    InvalidDecision(String),

    /// An amount string failed to parse.
    #[error("invalid amount: \"{value}\" ({reason})")]
    InvalidAmount {
        /// The rejected amount string.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A timestamp was not an RFC 3339 instant.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The rejected timestamp string.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The asset is not in the supported set.
    #[error("unsupported asset: \"{0}\"")]
    UnsupportedAsset(String),

    /// The escrow name was empty.
    #[error("name is mandatory")]
    NameRequired,

    /// The escrow name exceeded the configured limit.
    #[error("name too long: {len} bytes exceeds the limit of {max}")]
    NameTooLong {
        /// Length of the submitted name in bytes.
        len: usize,
        /// Configured maximum length in bytes.
        max: usize,
    },

    /// The arbitrator overlaps with another party.
    #[error("invalid participants: {reason}")]
    InvalidParticipants {
        /// Which overlap was detected.
        reason: String,
    },

    /// The receiver is the submitting party.
    #[error("self dealing: receiver {address} is the submitting party")]
    SelfDealing {
        /// The address that appears as both creator and receiver.
        address: String,
    },

    /// No `transfer.allow` intent accompanied the creation call.
    #[error("missing authorization: a transfer.allow intent is required")]
    MissingAuthorization,

    /// The authorized funding limit was zero.
    #[error("non-positive authorization: the transfer.allow limit must be greater than zero")]
    NonPositiveAuthorization,

    /// The requested amount is larger than the authorized limit.
    #[error("requested amount {requested} exceeds the authorized limit {limit}")]
    ExceedsAuthorization {
        /// Requested amount, formatted with three decimals.
        requested: String,
        /// Authorized limit, formatted with three decimals.
        limit: String,
    },
}
