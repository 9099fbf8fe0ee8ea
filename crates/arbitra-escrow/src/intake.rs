//! # Intake Validator
//!
//! Pure checks run on every request before it reaches the registry. Nothing
//! here reads the store or touches custody; a request that fails intake
//! leaves no trace.
//!
//! ## Creation Order
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. name non-empty,
//! 2. name within the configured limit (bytes),
//! 3. receiver non-empty,
//! 4. arbitrator non-empty,
//! 5. arbitrator differs from the receiver and the caller
//!    ([`ValidationError::InvalidParticipants`]),
//! 6. receiver differs from the caller ([`ValidationError::SelfDealing`]).
//!
//! Funding checks ([`validate_funding`]) follow the participant checks, so a
//! self-dealing request is rejected before any draw is attempted.

use arbitra_core::{Address, Amount, Asset, EscrowId, ValidationError};
use arbitra_host::TransferAllow;

use crate::config::EscrowConfig;
use crate::ledger::Vote;
use crate::record::Parties;

/// An escrow creation request as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    /// Display name.
    pub name: String,
    /// Receiver address, unvalidated.
    pub receiver: String,
    /// Arbitrator address, unvalidated.
    pub arbitrator: String,
    /// Explicit amount to lock. `None` locks the full authorized limit.
    pub amount: Option<Amount>,
}

impl CreateRequest {
    /// A request that locks the full authorized limit.
    pub fn new(
        name: impl Into<String>,
        receiver: impl Into<String>,
        arbitrator: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            receiver: receiver.into(),
            arbitrator: arbitrator.into(),
            amount: None,
        }
    }

    /// Request an explicit amount instead of the full limit.
    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }
}

/// A decision request after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionRequest {
    /// Target escrow.
    pub escrow_id: EscrowId,
    /// The caller's vote.
    pub vote: Vote,
}

/// What a creation will lock once funding is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Funding {
    /// Amount to draw.
    pub amount: Amount,
    /// Asset to draw.
    pub asset: Asset,
}

/// Validate name and participants of a creation request.
///
/// Returns the role-bound parties with `creator` set to the caller.
pub fn validate_creation(
    request: &CreateRequest,
    creator: &Address,
    config: &EscrowConfig,
) -> Result<Parties, ValidationError> {
    if request.name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if request.name.len() > config.max_name_length {
        return Err(ValidationError::NameTooLong {
            len: request.name.len(),
            max: config.max_name_length,
        });
    }
    let receiver = Address::parse(request.receiver.as_str(), "receiver")?;
    let arbitrator = Address::parse(request.arbitrator.as_str(), "arbitrator")?;

    if arbitrator == receiver {
        return Err(ValidationError::InvalidParticipants {
            reason: "arbitrator must be a third party, not the receiver".to_string(),
        });
    }
    if arbitrator == *creator {
        return Err(ValidationError::InvalidParticipants {
            reason: "arbitrator must be a third party, not the creator".to_string(),
        });
    }
    if receiver == *creator {
        return Err(ValidationError::SelfDealing {
            address: receiver.to_string(),
        });
    }

    Ok(Parties {
        creator: creator.clone(),
        receiver,
        arbitrator,
    })
}

/// Decide what to lock, given the caller's authorization.
///
/// # Errors
///
/// - [`ValidationError::MissingAuthorization`] without a `transfer.allow`
///   intent,
/// - [`ValidationError::NonPositiveAuthorization`] for an explicit zero
///   amount,
/// - [`ValidationError::ExceedsAuthorization`] when the explicit amount is
///   above the limit.
pub fn validate_funding(
    requested: Option<Amount>,
    authorization: Option<TransferAllow>,
) -> Result<Funding, ValidationError> {
    let allow = authorization.ok_or(ValidationError::MissingAuthorization)?;
    let amount = match requested {
        None => allow.limit,
        Some(amount) if amount.is_zero() => {
            return Err(ValidationError::NonPositiveAuthorization)
        }
        Some(amount) if amount > allow.limit => {
            return Err(ValidationError::ExceedsAuthorization {
                requested: amount.to_string(),
                limit: allow.limit.to_string(),
            })
        }
        Some(amount) => amount,
    };
    Ok(Funding {
        amount,
        asset: allow.asset,
    })
}

/// Validate the raw fields of a decision request.
///
/// The vote token is trimmed of surrounding spaces; no default is assumed
/// for a missing or unknown token.
pub fn validate_decision(raw_id: &str, raw_vote: &str) -> Result<DecisionRequest, ValidationError> {
    let escrow_id: EscrowId = raw_id.parse()?;
    let vote = Vote::parse_token(raw_vote.trim_matches(' '))?;
    Ok(DecisionRequest { escrow_id, vote })
}
