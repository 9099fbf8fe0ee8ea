//! # Decision Ledger
//!
//! Every escrow carries exactly three decision slots, one per [`Role`]. A
//! slot starts [`Decision::Unset`] and is set by its owning role casting a
//! [`Vote`].
//!
//! ## Consensus
//!
//! The escrow closes the moment any two slots hold the same vote. With three
//! slots and a threshold of two, at most one vote can reach the threshold,
//! so there is never a tie to break. [`DecisionLedger::evaluate`] is pure:
//! calling it again without an intervening vote returns the same answer.
//!
//! ## Persisted Form
//!
//! Slots persist as one ASCII digit each (`0` unset, `1` refund,
//! `2` release). [`DecisionLedger::from_codes`] rejects anything else instead
//! of coercing it to a default.

use serde::{Deserialize, Serialize};

use arbitra_core::ValidationError;

// ── Roles ──────────────────────────────────────────────────────────────

/// The three fixed positions in an escrow.
///
/// The position is significant: it decides who may vote in which slot and
/// where funds go when the escrow closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The party that created the escrow and locked the funds.
    Creator,
    /// The party the funds are intended for.
    Receiver,
    /// The neutral third party.
    Arbitrator,
}

impl Role {
    /// All roles in slot order.
    pub const ALL: [Role; 3] = [Role::Creator, Role::Receiver, Role::Arbitrator];

    /// Slot index of this role.
    pub fn index(&self) -> usize {
        match self {
            Self::Creator => 0,
            Self::Receiver => 1,
            Self::Arbitrator => 2,
        }
    }

    /// Compact label used in events (`f`, `t`, `arb`).
    pub fn short_label(&self) -> &'static str {
        match self {
            Self::Creator => "f",
            Self::Receiver => "t",
            Self::Arbitrator => "arb",
        }
    }

    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creator => "creator",
            Self::Receiver => "receiver",
            Self::Arbitrator => "arbitrator",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Votes and Decisions ────────────────────────────────────────────────

/// A vote a party can cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    /// Return the funds to the creator.
    Refund,
    /// Pay the funds to the receiver.
    Release,
}

impl Vote {
    /// Parse a decision token from a request payload.
    ///
    /// Accepted spellings: `release`, `r`, `true`, `True`, `TRUE`, `1` and
    /// `refund`, `f`, `false`, `False`, `FALSE`, `0`. No default is assumed
    /// for anything else.
    pub fn parse_token(token: &str) -> Result<Vote, ValidationError> {
        match token {
            "release" | "r" | "true" | "True" | "TRUE" | "1" => Ok(Vote::Release),
            "refund" | "f" | "false" | "False" | "FALSE" | "0" => Ok(Vote::Refund),
            other => Err(ValidationError::InvalidDecision(other.to_string())),
        }
    }

    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Refund => "refund",
            Self::Release => "release",
        }
    }
}

impl std::fmt::Display for Vote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The content of one ledger slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// No vote cast yet. Renders as `pending`.
    #[default]
    #[serde(rename = "pending")]
    Unset,
    /// The role voted to refund.
    Refund,
    /// The role voted to release.
    Release,
}

impl Decision {
    /// Persisted digit for this decision.
    pub fn code(&self) -> u8 {
        match self {
            Self::Unset => b'0',
            Self::Refund => b'1',
            Self::Release => b'2',
        }
    }

    /// Decode a persisted digit. Returns `None` for anything out of range.
    pub fn from_code(code: u8) -> Option<Decision> {
        match code {
            b'0' => Some(Self::Unset),
            b'1' => Some(Self::Refund),
            b'2' => Some(Self::Release),
            _ => None,
        }
    }

    /// The vote held in this slot, if any.
    pub fn vote(&self) -> Option<Vote> {
        match self {
            Self::Unset => None,
            Self::Refund => Some(Vote::Refund),
            Self::Release => Some(Vote::Release),
        }
    }

    /// Label used in read snapshots and events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "pending",
            Self::Refund => "refund",
            Self::Release => "release",
        }
    }
}

impl From<Vote> for Decision {
    fn from(vote: Vote) -> Self {
        match vote {
            Vote::Refund => Decision::Refund,
            Vote::Release => Decision::Release,
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Consensus ──────────────────────────────────────────────────────────

/// Result of evaluating a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consensus {
    /// No vote has reached two slots.
    Pending,
    /// Two slots agree on this vote.
    Reached(Vote),
}

impl Consensus {
    /// Whether the escrow should be closed.
    pub fn is_reached(&self) -> bool {
        matches!(self, Self::Reached(_))
    }
}

/// Number of matching slots required to close an escrow.
pub const CONSENSUS_THRESHOLD: usize = 2;

// ── Ledger ─────────────────────────────────────────────────────────────

/// Three decision slots indexed by [`Role`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DecisionLedger {
    slots: [Decision; 3],
}

impl DecisionLedger {
    /// A ledger with every slot unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted digits.
    ///
    /// Returns the first offending byte if any slot is out of range.
    pub fn from_codes(codes: [u8; 3]) -> Result<Self, u8> {
        let mut slots = [Decision::Unset; 3];
        for (slot, code) in slots.iter_mut().zip(codes) {
            *slot = Decision::from_code(code).ok_or(code)?;
        }
        Ok(Self { slots })
    }

    /// Persisted digits, in role order.
    pub fn codes(&self) -> [u8; 3] {
        self.slots.map(|d| d.code())
    }

    /// The current decision of `role`.
    pub fn get(&self, role: Role) -> Decision {
        self.slots[role.index()]
    }

    /// Set `role`'s slot, returning what it held before.
    ///
    /// Overwrites any earlier vote by the same role.
    pub fn record(&mut self, role: Role, vote: Vote) -> Decision {
        std::mem::replace(&mut self.slots[role.index()], vote.into())
    }

    /// Count the votes and report whether consensus exists.
    pub fn evaluate(&self) -> Consensus {
        let mut refunds = 0;
        let mut releases = 0;
        for slot in self.slots {
            match slot {
                Decision::Unset => {}
                Decision::Refund => refunds += 1,
                Decision::Release => releases += 1,
            }
        }
        if releases >= CONSENSUS_THRESHOLD {
            Consensus::Reached(Vote::Release)
        } else if refunds >= CONSENSUS_THRESHOLD {
            Consensus::Reached(Vote::Refund)
        } else {
            Consensus::Pending
        }
    }
}
