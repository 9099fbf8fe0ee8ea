#![deny(missing_docs)]

//! # arbitra-escrow: Two-of-Three Arbitrated Escrow
//!
//! A creator locks funds for a receiver and names an arbitrator. Each of the
//! three parties votes to refund or to release; the first outcome held by
//! two parties closes the escrow and moves the funds exactly once.
//!
//! - **Ledger** ([`ledger`]): roles, votes, the three decision slots and the
//!   consensus rule.
//!
//! - **Record** ([`record`]): the escrow entity and its vote transition.
//!
//! - **Registry** ([`registry`]): identifier allocation and record
//!   persistence over a [`KvStore`](arbitra_host::KvStore), through the
//!   strict [`codec`].
//!
//! - **Resolver** ([`resolver`]): routes a closed escrow's funds to the
//!   creator (refund) or the receiver (release).
//!
//! - **Intake** ([`intake`], [`payload`]): request parsing and validation.
//!
//! - **Contract** ([`contract`]): `create`, `decide` and `get`, each a
//!   single all-or-nothing call. [`shared`] serializes calls from several
//!   threads.
//!
//! - **Events** ([`events`]) and **configuration** ([`config`]).
//!
//! ## Crate Policy
//!
//! - Depends on `arbitra-core` and `arbitra-host` internally.
//! - Amounts are integer thousandths end to end.
//! - Corrupt persisted state is reported, never repaired.

pub mod codec;
pub mod config;
pub mod contract;
pub mod error;
pub mod events;
pub mod intake;
pub mod ledger;
pub mod payload;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod shared;
pub mod view;

pub use config::{ConfigError, EscrowConfig, VotePolicy};
pub use contract::{DecisionReceipt, EscrowContract};
pub use error::{ErrorKind, EscrowError};
pub use events::{EscrowEvent, EventEnvelope, EventSink, RecordingSink, TracingSink};
pub use intake::{CreateRequest, DecisionRequest};
pub use ledger::{Consensus, Decision, DecisionLedger, Role, Vote};
pub use record::{EscrowRecord, Outcome, Parties};
pub use registry::{load_record, save_record, IdAllocator, Registry};
pub use resolver::Payout;
pub use shared::SharedEscrow;
pub use view::{EscrowView, PartyView};
