//! # Contract Events
//!
//! Each state change is announced as a compact event:
//!
//! | Code | Event | Attributes |
//! |---|---|---|
//! | `cr` | escrow created | `id`, `f`, `t`, `arb`, `am`, `as` |
//! | `de` | decision recorded | `id`, `r`, `a`, `d` |
//! | `cl` | escrow closed | `id`, `o` |
//!
//! Events are delivered to an [`EventSink`] only after the call's writes are
//! committed. A rejected call emits nothing.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use arbitra_core::{Address, Amount, Asset, EscrowId, Timestamp, TxId};

use crate::ledger::{Role, Vote};
use crate::record::Outcome;

/// A state change worth announcing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscrowEvent {
    /// A new escrow locked funds.
    Created {
        /// New escrow.
        escrow_id: EscrowId,
        /// Creator address.
        creator: Address,
        /// Receiver address.
        receiver: Address,
        /// Arbitrator address.
        arbitrator: Address,
        /// Locked amount.
        amount: Amount,
        /// Locked asset.
        asset: Asset,
    },
    /// A party voted.
    Decided {
        /// Target escrow.
        escrow_id: EscrowId,
        /// Voter's role.
        role: Role,
        /// Voter's address.
        address: Address,
        /// The vote.
        vote: Vote,
    },
    /// Consensus sealed the escrow and funds moved.
    Closed {
        /// Sealed escrow.
        escrow_id: EscrowId,
        /// Final outcome.
        outcome: Outcome,
    },
}

impl EscrowEvent {
    /// Short event code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Created { .. } => "cr",
            Self::Decided { .. } => "de",
            Self::Closed { .. } => "cl",
        }
    }

    /// Attributes as flat strings.
    pub fn attributes(&self) -> BTreeMap<String, String> {
        let pairs: Vec<(&str, String)> = match self {
            Self::Created {
                escrow_id,
                creator,
                receiver,
                arbitrator,
                amount,
                asset,
            } => vec![
                ("id", escrow_id.to_string()),
                ("f", creator.to_string()),
                ("t", receiver.to_string()),
                ("arb", arbitrator.to_string()),
                ("am", amount.to_string()),
                ("as", asset.to_string()),
            ],
            Self::Decided {
                escrow_id,
                role,
                address,
                vote,
            } => vec![
                ("id", escrow_id.to_string()),
                ("r", role.short_label().to_string()),
                ("a", address.to_string()),
                ("d", vote.to_string()),
            ],
            Self::Closed { escrow_id, outcome } => vec![
                ("id", escrow_id.to_string()),
                ("o", outcome.to_string()),
            ],
        };
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    /// Wrap the event for delivery.
    pub fn envelope(&self, tx: &TxId) -> EventEnvelope {
        EventEnvelope {
            kind: self.code().to_string(),
            attributes: self.attributes(),
            tx: tx.clone(),
            at: Timestamp::now(),
        }
    }
}

/// Serialized form of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Event code (`cr`, `de`, `cl`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Event attributes.
    pub attributes: BTreeMap<String, String>,
    /// Transaction that caused the event.
    pub tx: TxId,
    /// Emission time.
    pub at: Timestamp,
}

// ── Sinks ──────────────────────────────────────────────────────────────

/// Destination for contract events.
pub trait EventSink: Send + Sync {
    /// Deliver one event.
    fn emit(&self, event: &EventEnvelope);
}

/// Logs each event as a JSON line on the `arbitra::events` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &EventEnvelope) {
        match serde_json::to_string(event) {
            Ok(json) => tracing::info!(target: "arbitra::events", event = %json),
            Err(e) => tracing::warn!(
                target: "arbitra::events",
                kind = %event.kind,
                error = %e,
                "failed to serialize event"
            ),
        }
    }
}

/// Keeps every event in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<EventEnvelope>>>,
}

impl RecordingSink {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<EventEnvelope> {
        self.events.lock().clone()
    }

    /// Event codes in emission order.
    pub fn codes(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.kind.clone()).collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &EventEnvelope) {
        self.events.lock().push(event.clone());
    }
}
