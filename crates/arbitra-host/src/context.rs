//! # Call Context
//!
//! Everything the host tells the contract about the current call: who is
//! calling, under which transaction, and which funding intents the caller
//! pre-authorized.
//!
//! ## Transfer Intents
//!
//! A creation call must carry a `transfer.allow` intent with two arguments:
//! `token` (the asset) and `limit` (a decimal amount). Only the first such
//! intent is considered; later ones are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use arbitra_core::{Address, Amount, Asset, TxId, ValidationError};

/// Intent type that authorizes the contract to draw funds.
pub const TRANSFER_ALLOW: &str = "transfer.allow";

/// A pre-authorization attached to a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Intent type, e.g. `transfer.allow`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-form string arguments.
    #[serde(default)]
    pub args: BTreeMap<String, String>,
}

impl Intent {
    /// Build a `transfer.allow` intent from raw `limit` and `token` strings.
    pub fn transfer_allow(limit: impl Into<String>, token: impl Into<String>) -> Self {
        let mut args = BTreeMap::new();
        args.insert("limit".to_string(), limit.into());
        args.insert("token".to_string(), token.into());
        Self {
            kind: TRANSFER_ALLOW.to_string(),
            args,
        }
    }
}

/// A parsed `transfer.allow` intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferAllow {
    /// Maximum amount the contract may draw.
    pub limit: Amount,
    /// Asset the limit applies to.
    pub asset: Asset,
}

/// Per-call information supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// Address of the calling party.
    pub sender: Address,
    /// Host transaction reference.
    pub tx_id: TxId,
    /// Intents attached to the call.
    pub intents: Vec<Intent>,
}

impl CallContext {
    /// A context without intents.
    pub fn new(sender: Address, tx_id: TxId) -> Self {
        Self {
            sender,
            tx_id,
            intents: Vec::new(),
        }
    }

    /// Attach an intent.
    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intents.push(intent);
        self
    }

    /// Parse the first `transfer.allow` intent, if there is one.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::UnsupportedAsset`] if the token is missing or
    ///   not in `supported`,
    /// - [`ValidationError::InvalidAmount`] if the limit does not parse,
    /// - [`ValidationError::NonPositiveAuthorization`] if the limit is zero.
    pub fn first_transfer_allow(
        &self,
        supported: &[Asset],
    ) -> Result<Option<TransferAllow>, ValidationError> {
        let Some(intent) = self.intents.iter().find(|i| i.kind == TRANSFER_ALLOW) else {
            return Ok(None);
        };

        let token = intent.args.get("token").map(String::as_str).unwrap_or("");
        let asset: Asset = token.parse()?;
        if !supported.contains(&asset) {
            return Err(ValidationError::UnsupportedAsset(token.to_string()));
        }

        let limit_str = intent.args.get("limit").map(String::as_str).unwrap_or("");
        let limit = Amount::parse_decimal(limit_str)?;
        if limit.is_zero() {
            return Err(ValidationError::NonPositiveAuthorization);
        }

        Ok(Some(TransferAllow { limit, asset }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> CallContext {
        CallContext::new(
            Address::parse("hive:sender", "sender").unwrap(),
            TxId::new("tx-1"),
        )
    }

    #[test]
    fn no_intent_yields_none() {
        assert_eq!(ctx().first_transfer_allow(&Asset::ALL).unwrap(), None);
    }

    #[test]
    fn parses_transfer_allow() {
        let c = ctx().with_intent(Intent::transfer_allow("1.000", "hive"));
        let ta = c.first_transfer_allow(&Asset::ALL).unwrap().unwrap();
        assert_eq!(ta.limit, Amount::from_millis(1_000));
        assert_eq!(ta.asset, Asset::Hive);
    }

    #[test]
    fn ignores_other_intent_types() {
        let mut other = Intent::transfer_allow("5.000", "hbd");
        other.kind = "custom.thing".to_string();
        let c = ctx()
            .with_intent(other)
            .with_intent(Intent::transfer_allow("2.000", "hbd"));
        let ta = c.first_transfer_allow(&Asset::ALL).unwrap().unwrap();
        assert_eq!(ta.limit, Amount::from_millis(2_000));
    }

    #[test]
    fn only_first_transfer_allow_counts() {
        let c = ctx()
            .with_intent(Intent::transfer_allow("1.000", "hive"))
            .with_intent(Intent::transfer_allow("9.000", "hbd"));
        let ta = c.first_transfer_allow(&Asset::ALL).unwrap().unwrap();
        assert_eq!(ta.asset, Asset::Hive);
    }

    #[test]
    fn rejects_negative_limit() {
        let c = ctx().with_intent(Intent::transfer_allow("-1.000", "hbd"));
        assert!(matches!(
            c.first_transfer_allow(&Asset::ALL),
            Err(ValidationError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn rejects_zero_limit() {
        let c = ctx().with_intent(Intent::transfer_allow("0.000", "hive"));
        assert_eq!(
            c.first_transfer_allow(&Asset::ALL),
            Err(ValidationError::NonPositiveAuthorization)
        );
    }

    #[test]
    fn rejects_unknown_or_disabled_token() {
        let c = ctx().with_intent(Intent::transfer_allow("1.000", "btc"));
        assert!(matches!(
            c.first_transfer_allow(&Asset::ALL),
            Err(ValidationError::UnsupportedAsset(_))
        ));

        let c = ctx().with_intent(Intent::transfer_allow("1.000", "hbd"));
        assert!(matches!(
            c.first_transfer_allow(&[Asset::Hive]),
            Err(ValidationError::UnsupportedAsset(_))
        ));
    }

    #[test]
    fn intent_json_uses_type_key() {
        let json = serde_json::to_value(Intent::transfer_allow("1.000", "hive")).unwrap();
        assert_eq!(json["type"], "transfer.allow");
        assert_eq!(json["args"]["limit"], "1.000");
    }
}
