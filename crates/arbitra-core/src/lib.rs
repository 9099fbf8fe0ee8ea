#![deny(missing_docs)]

//! # arbitra-core: Foundational Types for the Escrow Stack
//!
//! This crate defines the primitives every other `arbitra-*` crate builds on.
//! It depends on nothing internal.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** [`Address`], [`EscrowId`]
//!    and [`TxId`] are distinct types. An escrow identifier cannot be passed
//!    where a transaction identifier is expected.
//!
//! 2. **No floating point for value.** [`Amount`] is an integer count of
//!    thousandths. Amounts survive any number of persist/reload cycles
//!    without drift, and render as fixed three-digit decimals.
//!
//! 3. **Closed asset set.** [`Asset`] enumerates the supported tokens.
//!    Unknown tokens are rejected at parse time.
//!
//! 4. **[`ValidationError`] for every rejected primitive.** Structured
//!    errors with `thiserror`, carrying the offending input.

pub mod amount;
pub mod asset;
pub mod error;
pub mod identity;
pub mod temporal;

pub use amount::Amount;
pub use asset::Asset;
pub use error::ValidationError;
pub use identity::{Address, EscrowId, TxId};
pub use temporal::Timestamp;
