//! # Read Snapshot
//!
//! The shape returned by `get`:
//!
//! ```json
//! {"id":0,"n":"x","f":{"a":"hive:s","d":"pending"},"t":{"a":"hive:r","d":"pending"},
//!  "arb":{"a":"hive:a","d":"pending"},"am":"1.000","as":"hive","cl":false,"o":"pending"}
//! ```
//!
//! `am` is a string with exactly three fractional digits.

use serde::{Deserialize, Serialize};

use arbitra_core::{Address, Asset, EscrowId};

use crate::ledger::{Decision, Role};
use crate::record::{EscrowRecord, Outcome};

/// One party and its current vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyView {
    /// Address.
    #[serde(rename = "a")]
    pub address: Address,
    /// Current vote.
    #[serde(rename = "d")]
    pub decision: Decision,
}

/// Full read snapshot of an escrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowView {
    /// Identifier.
    pub id: EscrowId,
    /// Display name.
    #[serde(rename = "n")]
    pub name: String,
    /// Creator.
    #[serde(rename = "f")]
    pub creator: PartyView,
    /// Receiver.
    #[serde(rename = "t")]
    pub receiver: PartyView,
    /// Arbitrator.
    #[serde(rename = "arb")]
    pub arbitrator: PartyView,
    /// Locked amount, three decimals.
    #[serde(rename = "am")]
    pub amount: String,
    /// Locked asset.
    #[serde(rename = "as")]
    pub asset: Asset,
    /// Whether the escrow is sealed.
    #[serde(rename = "cl")]
    pub closed: bool,
    /// Outcome.
    #[serde(rename = "o")]
    pub outcome: Outcome,
}

impl EscrowView {
    /// Compact JSON rendering.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&EscrowRecord> for EscrowView {
    fn from(record: &EscrowRecord) -> Self {
        let party = |role: Role| PartyView {
            address: record.parties().address(role).clone(),
            decision: record.ledger().get(role),
        };
        Self {
            id: record.id(),
            name: record.name().to_string(),
            creator: party(Role::Creator),
            receiver: party(Role::Receiver),
            arbitrator: party(Role::Arbitrator),
            amount: record.amount().to_string(),
            asset: record.asset(),
            closed: record.is_closed(),
            outcome: record.outcome(),
        }
    }
}
