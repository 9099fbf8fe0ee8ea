//! # arbitra-host: Host Environment Primitives
//!
//! The escrow core runs inside a host that it does not own. This crate
//! expresses that host as a handful of narrow interfaces plus reference
//! implementations used by the CLI and the test suites:
//!
//! - **Store** ([`store`]): flat string-keyed persistence ([`KvStore`]) and
//!   an in-memory implementation ([`MemoryStore`]).
//!
//! - **Journal** ([`journal`]): a write-staging layer over any store. A call
//!   stages all of its writes and commits them only once every step has
//!   succeeded, so a failed call persists nothing.
//!
//! - **Custody** ([`custody`]): the value-moving primitives `draw` and
//!   `transfer` ([`Custody`]) and a balance ledger ([`MemoryCustody`]).
//!
//! - **Context** ([`context`]): the caller's address, the transaction
//!   reference and the attached funding intents ([`CallContext`]).
//!
//! - **Snapshot** ([`snapshot`]): serializable store + balances, so a host
//!   can survive process restarts.

pub mod context;
pub mod custody;
pub mod error;
pub mod journal;
pub mod snapshot;
pub mod store;

pub use context::{CallContext, Intent, TransferAllow, TRANSFER_ALLOW};
pub use custody::{Custody, MemoryCustody};
pub use error::{CustodyError, StoreError};
pub use journal::Journal;
pub use snapshot::HostSnapshot;
pub use store::{KvStore, MemoryStore};
