//! # Escrow Record
//!
//! The durable escrow entity: identity, name, the three role-bound parties,
//! the locked amount and asset, the decision ledger, and the outcome.
//!
//! ## Invariants
//!
//! - The record is closed exactly when its outcome is `Refund` or `Release`.
//!   The closed flag is derived from the outcome, so the two cannot disagree
//!   in memory.
//! - A closed record accepts no further votes. Nothing changes after close.
//! - Only the registry constructs records.

use serde::{Deserialize, Serialize};

use arbitra_core::{Address, Amount, Asset, EscrowId, TxId};

use crate::config::VotePolicy;
use crate::error::EscrowError;
use crate::ledger::{Consensus, Decision, DecisionLedger, Role, Vote};

// ── Outcome ────────────────────────────────────────────────────────────

/// Lifecycle label of an escrow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Open; no consensus yet.
    #[default]
    Pending,
    /// Closed; funds returned to the creator.
    Refund,
    /// Closed; funds paid to the receiver.
    Release,
}

impl Outcome {
    /// Whether this outcome seals the escrow.
    pub fn is_closed(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Refund => "refund",
            Self::Release => "release",
        }
    }

    /// Parse a canonical name.
    pub fn parse(s: &str) -> Option<Outcome> {
        match s {
            "pending" => Some(Self::Pending),
            "refund" => Some(Self::Refund),
            "release" => Some(Self::Release),
            _ => None,
        }
    }
}

impl From<Vote> for Outcome {
    fn from(vote: Vote) -> Self {
        match vote {
            Vote::Refund => Outcome::Refund,
            Vote::Release => Outcome::Release,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Parties ────────────────────────────────────────────────────────────

/// The three role-bound addresses of an escrow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parties {
    /// Party that locked the funds.
    pub creator: Address,
    /// Party the funds are intended for.
    pub receiver: Address,
    /// Neutral third party.
    pub arbitrator: Address,
}

impl Parties {
    /// The address holding `role`.
    pub fn address(&self, role: Role) -> &Address {
        match role {
            Role::Creator => &self.creator,
            Role::Receiver => &self.receiver,
            Role::Arbitrator => &self.arbitrator,
        }
    }

    /// The role held by `address`.
    ///
    /// Exact string equality. Returns `None` unless exactly one role matches.
    pub fn role_of(&self, address: &Address) -> Option<Role> {
        let mut matches = Role::ALL
            .into_iter()
            .filter(|role| self.address(*role) == address);
        match (matches.next(), matches.next()) {
            (Some(role), None) => Some(role),
            _ => None,
        }
    }
}

// ── Record ─────────────────────────────────────────────────────────────

/// What a recorded vote did to the escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteEffect {
    /// Role that voted.
    pub role: Role,
    /// The slot's value before this vote.
    pub previous: Decision,
    /// Set when this vote closed the escrow.
    pub closed_with: Option<Vote>,
}

/// A persisted escrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscrowRecord {
    id: EscrowId,
    name: String,
    parties: Parties,
    amount: Amount,
    asset: Asset,
    created_tx: TxId,
    ledger: DecisionLedger,
    outcome: Outcome,
}

impl EscrowRecord {
    /// A fresh, open record with an all-unset ledger.
    pub(crate) fn open(
        id: EscrowId,
        name: String,
        parties: Parties,
        amount: Amount,
        asset: Asset,
        created_tx: TxId,
    ) -> Self {
        Self {
            id,
            name,
            parties,
            amount,
            asset,
            created_tx,
            ledger: DecisionLedger::new(),
            outcome: Outcome::Pending,
        }
    }

    /// Reassemble a record read back from storage.
    ///
    /// The codec checks consistency between `ledger` and `outcome` before
    /// calling this.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: EscrowId,
        name: String,
        parties: Parties,
        amount: Amount,
        asset: Asset,
        created_tx: TxId,
        ledger: DecisionLedger,
        outcome: Outcome,
    ) -> Self {
        Self {
            id,
            name,
            parties,
            amount,
            asset,
            created_tx,
            ledger,
            outcome,
        }
    }

    /// Escrow identifier.
    pub fn id(&self) -> EscrowId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Role-bound addresses.
    pub fn parties(&self) -> &Parties {
        &self.parties
    }

    /// Locked amount.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Locked asset.
    pub fn asset(&self) -> Asset {
        self.asset
    }

    /// Transaction that created the escrow.
    pub fn created_tx(&self) -> &TxId {
        &self.created_tx
    }

    /// The decision ledger.
    pub fn ledger(&self) -> &DecisionLedger {
        &self.ledger
    }

    /// Current outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Whether the escrow is sealed.
    pub fn is_closed(&self) -> bool {
        self.outcome.is_closed()
    }

    /// The role `address` holds on this escrow.
    pub fn role_of(&self, address: &Address) -> Option<Role> {
        self.parties.role_of(address)
    }

    /// Record `role`'s vote, then evaluate consensus.
    ///
    /// If the vote completes a two-of-three agreement the record is sealed
    /// with that outcome and [`VoteEffect::closed_with`] is set. The caller
    /// must resolve custody before the sealed record is persisted.
    ///
    /// # Errors
    ///
    /// - [`EscrowError::AlreadyClosed`] if the record is sealed,
    /// - [`EscrowError::VoteAlreadyCast`] under [`VotePolicy::FinalOnceCast`]
    ///   when the role has voted before.
    pub fn record_vote(
        &mut self,
        role: Role,
        vote: Vote,
        policy: VotePolicy,
    ) -> Result<VoteEffect, EscrowError> {
        if self.is_closed() {
            return Err(EscrowError::AlreadyClosed {
                escrow_id: self.id,
                outcome: self.outcome,
            });
        }
        let current = self.ledger.get(role);
        if policy == VotePolicy::FinalOnceCast && current != Decision::Unset {
            return Err(EscrowError::VoteAlreadyCast {
                escrow_id: self.id,
                role,
                decision: current,
            });
        }

        let previous = self.ledger.record(role, vote);
        let closed_with = match self.ledger.evaluate() {
            Consensus::Reached(winner) => {
                self.outcome = winner.into();
                Some(winner)
            }
            Consensus::Pending => None,
        };

        Ok(VoteEffect {
            role,
            previous,
            closed_with,
        })
    }
}
