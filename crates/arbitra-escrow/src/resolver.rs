//! # Custody Resolver
//!
//! Turns a closed outcome into exactly one fund movement.
//!
//! | Outcome | Recipient |
//! |---|---|
//! | `refund` | creator |
//! | `release` | receiver |
//!
//! The arbitrator never receives funds. The resolver is only reached on the
//! call that closes an escrow; a closed record accepts no further votes, so
//! no later call can reach it again for the same escrow.

use arbitra_core::{Address, Amount, Asset, EscrowId};
use arbitra_host::Custody;

use crate::error::EscrowError;
use crate::ledger::Role;
use crate::record::{EscrowRecord, Outcome};

/// The single transfer owed by a closed escrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    /// The escrow being settled.
    pub escrow_id: EscrowId,
    /// Role of the recipient.
    pub role: Role,
    /// Recipient address.
    pub recipient: Address,
    /// Full locked amount.
    pub amount: Amount,
    /// Locked asset.
    pub asset: Asset,
}

/// Work out who is owed the locked funds.
///
/// Fails with [`EscrowError::NotClosed`] if the record is still open.
pub fn payout_for(record: &EscrowRecord) -> Result<Payout, EscrowError> {
    let role = match record.outcome() {
        Outcome::Refund => Role::Creator,
        Outcome::Release => Role::Receiver,
        Outcome::Pending => {
            return Err(EscrowError::NotClosed {
                escrow_id: record.id(),
            })
        }
    };
    Ok(Payout {
        escrow_id: record.id(),
        role,
        recipient: record.parties().address(role).clone(),
        amount: record.amount(),
        asset: record.asset(),
    })
}

/// Pay out a closed escrow.
///
/// # Errors
///
/// - [`EscrowError::NotClosed`] if the record is still open,
/// - [`EscrowError::CustodyTransferFailed`] if the custody primitive refuses
///   the transfer. Nothing has moved in that case.
pub fn resolve<C: Custody + ?Sized>(
    record: &EscrowRecord,
    custody: &mut C,
) -> Result<Payout, EscrowError> {
    let payout = payout_for(record)?;
    custody
        .transfer(&payout.recipient, payout.amount, payout.asset)
        .map_err(|source| {
            tracing::error!(
                escrow_id = %payout.escrow_id,
                recipient = %payout.recipient,
                error = %source,
                "custody transfer failed"
            );
            EscrowError::CustodyTransferFailed {
                escrow_id: payout.escrow_id,
                source,
            }
        })?;
    tracing::info!(
        escrow_id = %payout.escrow_id,
        recipient = %payout.recipient,
        role = %payout.role,
        amount = %payout.amount,
        asset = %payout.asset,
        "escrow funds transferred"
    );
    Ok(payout)
}
