//! # Request Payloads
//!
//! Hosts deliver call arguments as compact pipe-separated strings:
//!
//! | Call | Payload |
//! |---|---|
//! | create | `Name\|Receiver\|Arbitrator` |
//! | decide | `EscrowId\|Decision` |
//! | get | `EscrowId` |
//!
//! Parsing only checks shape. Business rules live in [`crate::intake`].

use arbitra_core::{EscrowId, ValidationError};

use crate::intake::{self, CreateRequest, DecisionRequest};

const CREATE_LAYOUT: &str = "Name|Receiver|Arbitrator";
const DECIDE_LAYOUT: &str = "EscrowId|Decision";

fn malformed(expected: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::MalformedPayload {
        expected: expected.to_string(),
        reason: reason.into(),
    }
}

/// Parse a creation payload into a request locking the full limit.
pub fn parse_create(payload: &str) -> Result<CreateRequest, ValidationError> {
    if payload.is_empty() {
        return Err(malformed(CREATE_LAYOUT, "empty payload"));
    }
    let fields: Vec<&str> = payload.split('|').collect();
    let [name, receiver, arbitrator] = fields[..] else {
        return Err(malformed(
            CREATE_LAYOUT,
            format!("expected 3 fields, found {}", fields.len()),
        ));
    };
    Ok(CreateRequest::new(name, receiver, arbitrator))
}

/// Parse a decision payload.
///
/// Everything after the first `|` is the decision token.
pub fn parse_decision(payload: &str) -> Result<DecisionRequest, ValidationError> {
    if payload.is_empty() {
        return Err(malformed(DECIDE_LAYOUT, "empty payload"));
    }
    let (raw_id, raw_vote) = payload
        .split_once('|')
        .ok_or_else(|| malformed(DECIDE_LAYOUT, "missing '|' separator"))?;
    intake::validate_decision(raw_id, raw_vote)
}

/// Parse a read payload.
pub fn parse_escrow_id(payload: &str) -> Result<EscrowId, ValidationError> {
    if payload.is_empty() {
        return Err(malformed("EscrowId", "empty payload"));
    }
    payload.parse()
}
