//! # Custody Primitives
//!
//! Value movement is owned by the host. The escrow core only ever asks for
//! two things:
//!
//! - `draw`: lock funds from the caller into the contract's vault when an
//!   escrow is created,
//! - `transfer`: pay funds out of the vault when an escrow closes.
//!
//! Both are all-or-nothing per invocation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use arbitra_core::{Address, Amount, Asset};

use crate::error::CustodyError;

/// Host primitive that moves locked value.
pub trait Custody {
    /// Move `amount` of `asset` from `from` into the contract vault.
    fn draw(&mut self, from: &Address, amount: Amount, asset: Asset) -> Result<(), CustodyError>;

    /// Move `amount` of `asset` from the contract vault to `to`.
    fn transfer(&mut self, to: &Address, amount: Amount, asset: Asset)
        -> Result<(), CustodyError>;
}

const VAULT: &str = "vault";

/// Balance ledger keeping per-account holdings and the contract vault.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCustody {
    balances: BTreeMap<Address, BTreeMap<Asset, Amount>>,
    vault: BTreeMap<Asset, Amount>,
}

impl MemoryCustody {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add funds to an account out of thin air (faucet for tests and the CLI).
    pub fn credit(
        &mut self,
        account: &Address,
        amount: Amount,
        asset: Asset,
    ) -> Result<(), CustodyError> {
        let slot = self
            .balances
            .entry(account.clone())
            .or_default()
            .entry(asset)
            .or_default();
        *slot = slot
            .checked_add(amount)
            .ok_or_else(|| CustodyError::BalanceOverflow {
                account: account.to_string(),
                asset,
                amount,
            })?;
        Ok(())
    }

    /// Current balance of `account` in `asset`.
    pub fn balance(&self, account: &Address, asset: Asset) -> Amount {
        self.balances
            .get(account)
            .and_then(|assets| assets.get(&asset))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Funds currently locked in the vault for `asset`.
    pub fn vault_balance(&self, asset: Asset) -> Amount {
        self.vault.get(&asset).copied().unwrap_or(Amount::ZERO)
    }
}

impl Custody for MemoryCustody {
    fn draw(&mut self, from: &Address, amount: Amount, asset: Asset) -> Result<(), CustodyError> {
        let available = self.balance(from, asset);
        let remaining =
            available
                .checked_sub(amount)
                .ok_or_else(|| CustodyError::InsufficientFunds {
                    account: from.to_string(),
                    asset,
                    available,
                    requested: amount,
                })?;
        let locked = self
            .vault_balance(asset)
            .checked_add(amount)
            .ok_or_else(|| CustodyError::BalanceOverflow {
                account: VAULT.to_string(),
                asset,
                amount,
            })?;

        self.balances
            .entry(from.clone())
            .or_default()
            .insert(asset, remaining);
        self.vault.insert(asset, locked);
        tracing::debug!(from = %from, %amount, %asset, "custody draw");
        Ok(())
    }

    fn transfer(
        &mut self,
        to: &Address,
        amount: Amount,
        asset: Asset,
    ) -> Result<(), CustodyError> {
        let locked = self.vault_balance(asset);
        let remaining =
            locked
                .checked_sub(amount)
                .ok_or_else(|| CustodyError::InsufficientFunds {
                    account: VAULT.to_string(),
                    asset,
                    available: locked,
                    requested: amount,
                })?;
        let credited = self
            .balance(to, asset)
            .checked_add(amount)
            .ok_or_else(|| CustodyError::BalanceOverflow {
                account: to.to_string(),
                asset,
                amount,
            })?;

        self.vault.insert(asset, remaining);
        self.balances
            .entry(to.clone())
            .or_default()
            .insert(asset, credited);
        tracing::debug!(to = %to, %amount, %asset, "custody transfer");
        Ok(())
    }
}
