//! # Persisted Record Codec
//!
//! Layout in the key-value store:
//!
//! | Key | Value |
//! |---|---|
//! | `cnt:e` | next escrow id, decimal; absent means `0` |
//! | `e:{id}` | header JSON `{n, p, am, as, tx, cl, o}` |
//! | `e:{id}\|d` | three ASCII digits, creator/receiver/arbitrator |
//!
//! `p` lists the creator, receiver and arbitrator addresses in that order.
//! `am` is the locked amount in thousandths, an integer: amounts never pass
//! through floating point on their way to or from storage.
//!
//! ## Decoding Is Strict
//!
//! Unknown header fields, a party list that is not exactly three non-empty
//! addresses, an unsupported asset, an unknown outcome, a closed flag that
//! disagrees with the outcome, decision strings that are not exactly three
//! digits in `0..=2`, and ledgers whose consensus contradicts the stored
//! outcome are all reported as [`EscrowError::CorruptState`].

use serde::Deserialize;

use arbitra_core::{Address, Amount, Asset, EscrowId, TxId};

use crate::error::EscrowError;
use crate::ledger::{Consensus, DecisionLedger};
use crate::record::{EscrowRecord, Outcome, Parties};

/// Key of the next-id counter.
pub const COUNTER_KEY: &str = "cnt:e";

/// Key of an escrow's header.
pub fn header_key(id: EscrowId) -> String {
    format!("e:{id}")
}

/// Key of an escrow's decision slots.
pub fn decisions_key(id: EscrowId) -> String {
    format!("e:{id}|d")
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct HeaderRepr {
    n: String,
    p: Vec<String>,
    am: u64,
    #[serde(rename = "as")]
    asset: String,
    tx: String,
    cl: bool,
    o: String,
}

/// Serialize a record into its `(key, value)` writes.
pub fn encode_record(record: &EscrowRecord) -> Vec<(String, String)> {
    let parties = record.parties();
    let header = serde_json::json!({
        "n": record.name(),
        "p": [
            parties.creator.as_str(),
            parties.receiver.as_str(),
            parties.arbitrator.as_str(),
        ],
        "am": record.amount().millis(),
        "as": record.asset().as_str(),
        "tx": record.created_tx().as_str(),
        "cl": record.is_closed(),
        "o": record.outcome().as_str(),
    });
    vec![
        (header_key(record.id()), header.to_string()),
        (decisions_key(record.id()), encode_decisions(record.ledger())),
    ]
}

/// Serialize the decision slots.
pub fn encode_decisions(ledger: &DecisionLedger) -> String {
    ledger.codes().iter().map(|c| char::from(*c)).collect()
}

/// Rebuild a record from its persisted header and decisions.
pub fn decode_record(
    id: EscrowId,
    header: &str,
    decisions: &str,
) -> Result<EscrowRecord, EscrowError> {
    let hkey = header_key(id);
    let repr: HeaderRepr = serde_json::from_str(header)
        .map_err(|e| EscrowError::corrupt(&hkey, format!("malformed header: {e}")))?;

    let [creator, receiver, arbitrator]: [String; 3] =
        repr.p.try_into().map_err(|p: Vec<String>| {
            EscrowError::corrupt(&hkey, format!("expected 3 parties, found {}", p.len()))
        })?;
    let party = |value: String, role: &str| {
        Address::parse(value, role)
            .map_err(|e| EscrowError::corrupt(&hkey, format!("bad {role} address: {e}")))
    };
    let parties = Parties {
        creator: party(creator, "creator")?,
        receiver: party(receiver, "receiver")?,
        arbitrator: party(arbitrator, "arbitrator")?,
    };

    let asset: Asset = repr
        .asset
        .parse()
        .map_err(|e| EscrowError::corrupt(&hkey, format!("{e}")))?;
    let outcome = Outcome::parse(&repr.o)
        .ok_or_else(|| EscrowError::corrupt(&hkey, format!("unknown outcome \"{}\"", repr.o)))?;
    if repr.cl != outcome.is_closed() {
        return Err(EscrowError::corrupt(
            &hkey,
            format!("closed flag {} contradicts outcome {outcome}", repr.cl),
        ));
    }

    let ledger = decode_decisions(id, decisions)?;
    let expected = match ledger.evaluate() {
        Consensus::Pending => Outcome::Pending,
        Consensus::Reached(vote) => vote.into(),
    };
    if expected != outcome {
        return Err(EscrowError::corrupt(
            decisions_key(id),
            format!("ledger implies {expected} but header records {outcome}"),
        ));
    }

    Ok(EscrowRecord::restore(
        id,
        repr.n,
        parties,
        Amount::from_millis(repr.am),
        asset,
        TxId::new(repr.tx),
        ledger,
        outcome,
    ))
}

/// Parse the decision slots.
pub fn decode_decisions(id: EscrowId, raw: &str) -> Result<DecisionLedger, EscrowError> {
    let key = decisions_key(id);
    let codes: [u8; 3] = raw.as_bytes().try_into().map_err(|_| {
        EscrowError::corrupt(&key, format!("expected 3 decision bytes, found {}", raw.len()))
    })?;
    DecisionLedger::from_codes(codes)
        .map_err(|bad| EscrowError::corrupt(&key, format!("invalid decision byte 0x{bad:02x}")))
}

/// Serialize the next-id counter.
pub fn encode_counter(next: EscrowId) -> String {
    next.to_string()
}

/// Parse the next-id counter.
pub fn decode_counter(raw: &str) -> Result<EscrowId, EscrowError> {
    raw.parse()
        .map_err(|_| EscrowError::corrupt(COUNTER_KEY, format!("invalid counter \"{raw}\"")))
}
