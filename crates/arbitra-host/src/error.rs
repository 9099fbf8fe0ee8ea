//! # Host Error Types
//!
//! Failures reported by the host primitives. The escrow core maps these onto
//! its own taxonomy; it never retries them.

use thiserror::Error;

use arbitra_core::{Address, Amount, Asset};

/// Errors from the key-value persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing medium rejected a read or write.
    #[error("store I/O error at {path}: {source}")]
    Io {
        /// Location of the backing file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A snapshot could not be serialized or parsed.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the custody primitives.
///
/// Every custody call is all-or-nothing: when one of these is returned no
/// balance has changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    /// The source account holds less than the requested amount.
    #[error("insufficient funds: {account} holds {available} {asset}, {requested} requested")]
    InsufficientFunds {
        /// Account being debited (an address, or `vault`).
        account: String,
        /// Asset being moved.
        asset: Asset,
        /// Current balance.
        available: Amount,
        /// Requested amount.
        requested: Amount,
    },

    /// Crediting the destination would overflow its balance.
    #[error("balance overflow crediting {amount} {asset} to {account}")]
    BalanceOverflow {
        /// Account being credited.
        account: String,
        /// Asset being moved.
        asset: Asset,
        /// Amount that could not be added.
        amount: Amount,
    },

    /// The host refused the movement for a reason of its own.
    #[error("custody rejected transfer of {amount} {asset} to {recipient}: {reason}")]
    Rejected {
        /// Intended recipient.
        recipient: Address,
        /// Amount.
        amount: Amount,
        /// Asset.
        asset: Asset,
        /// Host-supplied reason.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_display() {
        let err = CustodyError::InsufficientFunds {
            account: "hive:sender".to_string(),
            asset: Asset::Hive,
            available: Amount::from_millis(1_000),
            requested: Amount::from_millis(1_001),
        };
        let msg = format!("{err}");
        assert!(msg.contains("hive:sender"));
        assert!(msg.contains("1.000 hive"));
        assert!(msg.contains("1.001"));
    }

    #[test]
    fn io_error_display_includes_path() {
        let err = StoreError::Io {
            path: "/tmp/state.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(format!("{err}").contains("/tmp/state.json"));
    }
}
