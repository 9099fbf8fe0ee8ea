//! # Escrow Contract
//!
//! The three externally callable operations, bound to a store, a custody
//! primitive and an event sink.
//!
//! ## Call Atomicity
//!
//! Each call stages its writes in a [`Journal`] over the store and commits
//! them in one batch only after every step has succeeded. A failed call
//! therefore persists nothing, including the identifier counter.
//!
//! ## Sequencing With Custody
//!
//! - **create**: validate, stage the record, draw the creator's funds, then
//!   commit. If the commit fails after the draw the funds are paid back to
//!   the creator.
//! - **decide**: load, record the vote, stage the record, and when the vote
//!   closes the escrow pay out before committing. A refused payout drops the
//!   journal, so the escrow stays open with its previous ledger. If the
//!   commit fails after the payout, the payout is drawn back into the vault
//!   so that the still-open escrow remains fully funded.
//!
//! Events are emitted after the commit.

use std::sync::Arc;

use arbitra_core::{Address, EscrowId};
use arbitra_host::{CallContext, Custody, Journal, KvStore};

use crate::config::EscrowConfig;
use crate::error::EscrowError;
use crate::events::{EscrowEvent, EventSink, TracingSink};
use crate::intake::{self, CreateRequest, DecisionRequest};
use crate::ledger::{Decision, Role, Vote};
use crate::payload;
use crate::registry::{self, Registry};
use crate::resolver::{self, Payout};
use crate::view::EscrowView;

/// What a successful decision did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionReceipt {
    /// Target escrow.
    pub escrow_id: EscrowId,
    /// Caller's role.
    pub role: Role,
    /// The vote recorded.
    pub vote: Vote,
    /// The slot's value before the vote.
    pub previous: Decision,
    /// The transfer made, when this vote closed the escrow.
    pub payout: Option<Payout>,
}

impl DecisionReceipt {
    /// Whether this decision closed the escrow.
    pub fn closed(&self) -> bool {
        self.payout.is_some()
    }
}

/// Two-of-three arbitrated escrow over host primitives.
pub struct EscrowContract<S: KvStore, C: Custody> {
    store: S,
    custody: C,
    config: EscrowConfig,
    events: Arc<dyn EventSink>,
}

impl<S: KvStore, C: Custody> EscrowContract<S, C> {
    /// A contract that logs its events through `tracing`.
    pub fn new(store: S, custody: C, config: EscrowConfig) -> Self {
        Self {
            store,
            custody,
            config,
            events: Arc::new(TracingSink),
        }
    }

    /// Replace the event sink.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The custody primitive.
    pub fn custody(&self) -> &C {
        &self.custody
    }

    /// Mutable access to the custody primitive, for hosts that fund
    /// accounts between calls.
    pub fn custody_mut(&mut self) -> &mut C {
        &mut self.custody
    }

    /// Give back the store and custody.
    pub fn into_parts(self) -> (S, C) {
        (self.store, self.custody)
    }

    // ── create ─────────────────────────────────────────────────────────

    /// Open a new escrow funded by the caller.
    ///
    /// The caller becomes the creator. Funding comes from the first
    /// `transfer.allow` intent on `ctx`: the full limit is locked unless the
    /// request names a smaller amount.
    pub fn create(
        &mut self,
        ctx: &CallContext,
        request: CreateRequest,
    ) -> Result<EscrowId, EscrowError> {
        self.create_inner(ctx, request)
            .map_err(|e| rejected("create", &ctx.sender, e))
    }

    /// [`EscrowContract::create`] from a `Name|Receiver|Arbitrator` payload.
    pub fn create_from_payload(
        &mut self,
        ctx: &CallContext,
        raw: &str,
    ) -> Result<EscrowId, EscrowError> {
        let request = payload::parse_create(raw)
            .map_err(|e| rejected("create", &ctx.sender, e.into()))?;
        self.create(ctx, request)
    }

    fn create_inner(
        &mut self,
        ctx: &CallContext,
        request: CreateRequest,
    ) -> Result<EscrowId, EscrowError> {
        let parties = intake::validate_creation(&request, &ctx.sender, &self.config)?;
        let authorization = ctx.first_transfer_allow(&self.config.supported_assets)?;
        let funding = intake::validate_funding(request.amount, authorization)?;

        let mut registry = Registry::open(Journal::new(&self.store))?;
        let record = registry.create(
            request.name,
            parties,
            funding.amount,
            funding.asset,
            ctx.tx_id.clone(),
        )?;
        let writes = registry.into_store().into_writes();

        let creator = &record.parties().creator;
        self.custody
            .draw(creator, funding.amount, funding.asset)
            .map_err(EscrowError::DrawFailed)?;

        if let Err(e) = self.store.apply(writes) {
            if let Err(refund) = self
                .custody
                .transfer(creator, funding.amount, funding.asset)
            {
                tracing::error!(
                    escrow_id = %record.id(),
                    creator = %creator,
                    error = %refund,
                    "failed to return drawn funds after commit failure"
                );
            }
            return Err(e.into());
        }

        tracing::info!(
            escrow_id = %record.id(),
            creator = %creator,
            amount = %funding.amount,
            asset = %funding.asset,
            "escrow created"
        );
        self.emit(
            ctx,
            EscrowEvent::Created {
                escrow_id: record.id(),
                creator: creator.clone(),
                receiver: record.parties().receiver.clone(),
                arbitrator: record.parties().arbitrator.clone(),
                amount: record.amount(),
                asset: record.asset(),
            },
        );
        Ok(record.id())
    }

    // ── decide ─────────────────────────────────────────────────────────

    /// Record the caller's vote on an escrow.
    ///
    /// When the vote completes a two-of-three agreement the locked funds are
    /// paid out in the same call.
    pub fn decide(
        &mut self,
        ctx: &CallContext,
        request: DecisionRequest,
    ) -> Result<DecisionReceipt, EscrowError> {
        self.decide_inner(ctx, request)
            .map_err(|e| rejected("decide", &ctx.sender, e))
    }

    /// [`EscrowContract::decide`] from an `EscrowId|Decision` payload.
    pub fn decide_from_payload(
        &mut self,
        ctx: &CallContext,
        raw: &str,
    ) -> Result<DecisionReceipt, EscrowError> {
        let request = payload::parse_decision(raw)
            .map_err(|e| rejected("decide", &ctx.sender, e.into()))?;
        self.decide(ctx, request)
    }

    fn decide_inner(
        &mut self,
        ctx: &CallContext,
        request: DecisionRequest,
    ) -> Result<DecisionReceipt, EscrowError> {
        let escrow_id = request.escrow_id;
        let mut journal = Journal::new(&self.store);
        let mut record = registry::load_record(&journal, escrow_id)?;
        let role = record
            .role_of(&ctx.sender)
            .ok_or_else(|| EscrowError::NotAParty {
                escrow_id,
                address: ctx.sender.to_string(),
            })?;
        let effect = record.record_vote(role, request.vote, self.config.vote_policy)?;
        registry::save_record(&mut journal, &record)?;
        let writes = journal.into_writes();

        let payout = match effect.closed_with {
            Some(_) => Some(resolver::resolve(&record, &mut self.custody)?),
            None => None,
        };

        if let Err(e) = self.store.apply(writes) {
            if let Some(payout) = &payout {
                self.reverse_payout(payout);
            }
            return Err(e.into());
        }

        tracing::info!(
            escrow_id = %escrow_id,
            role = %role,
            vote = %request.vote,
            "decision recorded"
        );
        self.emit(
            ctx,
            EscrowEvent::Decided {
                escrow_id,
                role,
                address: ctx.sender.clone(),
                vote: request.vote,
            },
        );
        if payout.is_some() {
            tracing::info!(escrow_id = %escrow_id, outcome = %record.outcome(), "escrow closed");
            self.emit(
                ctx,
                EscrowEvent::Closed {
                    escrow_id,
                    outcome: record.outcome(),
                },
            );
        }

        Ok(DecisionReceipt {
            escrow_id,
            role,
            vote: request.vote,
            previous: effect.previous,
            payout,
        })
    }

    // ── get ────────────────────────────────────────────────────────────

    /// Read snapshot of an escrow.
    pub fn get(&self, escrow_id: EscrowId) -> Result<EscrowView, EscrowError> {
        let record = registry::load_record(&self.store, escrow_id).map_err(|e| {
            if e.is_fatal() {
                tracing::error!(escrow_id = %escrow_id, error = %e, "escrow read failed");
            }
            e
        })?;
        Ok(EscrowView::from(&record))
    }

    /// [`EscrowContract::get`] from a decimal id payload, rendered as JSON.
    pub fn get_from_payload(&self, raw: &str) -> Result<String, EscrowError> {
        let escrow_id = payload::parse_escrow_id(raw)?;
        let view = self.get(escrow_id)?;
        view.to_json()
            .map_err(|e| EscrowError::corrupt(crate::codec::header_key(escrow_id), e.to_string()))
    }

    /// Draw a payout back into the vault after its closing state failed to
    /// commit.
    fn reverse_payout(&mut self, payout: &Payout) {
        match self
            .custody
            .draw(&payout.recipient, payout.amount, payout.asset)
        {
            Ok(()) => tracing::warn!(
                escrow_id = %payout.escrow_id,
                recipient = %payout.recipient,
                amount = %payout.amount,
                asset = %payout.asset,
                "payout reversed after commit failure"
            ),
            Err(e) => tracing::error!(
                escrow_id = %payout.escrow_id,
                recipient = %payout.recipient,
                error = %e,
                "escrow paid out but closed state was not committed and the payout could not be reversed"
            ),
        }
    }

    fn emit(&self, ctx: &CallContext, event: EscrowEvent) {
        self.events.emit(&event.envelope(&ctx.tx_id));
    }
}

fn rejected(op: &'static str, sender: &Address, e: EscrowError) -> EscrowError {
    if e.is_fatal() {
        tracing::error!(op, sender = %sender, kind = ?e.kind(), error = %e, "call failed");
    } else {
        tracing::warn!(op, sender = %sender, kind = ?e.kind(), error = %e, "call rejected");
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VotePolicy;
    use crate::error::ErrorKind;
    use crate::events::RecordingSink;
    use crate::record::tests::addr;
    use crate::record::Outcome;
    use arbitra_core::{Amount, Asset, TxId, ValidationError};
    use arbitra_host::{CustodyError, Intent, MemoryCustody, MemoryStore, StoreError};
    use std::cell::Cell;

    type Contract = EscrowContract<MemoryStore, MemoryCustody>;

    fn ctx(sender: &str) -> CallContext {
        CallContext::new(addr(sender), TxId::new(format!("tx-{sender}")))
    }

    fn funded_ctx(sender: &str, limit: &str, token: &str) -> CallContext {
        ctx(sender).with_intent(Intent::transfer_allow(limit, token))
    }

    fn contract_with(config: EscrowConfig) -> (Contract, RecordingSink) {
        let mut custody = MemoryCustody::new();
        custody
            .credit(&addr("hive:sender"), Amount::from_millis(10_000), Asset::Hive)
            .unwrap();
        let sink = RecordingSink::new();
        let contract = EscrowContract::new(MemoryStore::new(), custody, config)
            .with_event_sink(Arc::new(sink.clone()));
        (contract, sink)
    }

    fn contract() -> (Contract, RecordingSink) {
        contract_with(EscrowConfig::default())
    }

    fn create_default(c: &mut Contract) -> EscrowId {
        c.create_from_payload(
            &funded_ctx("hive:sender", "1.000", "hive"),
            "escrow|hive:receiver|hive:arbitrator",
        )
        .unwrap()
    }

    fn decide(c: &mut Contract, who: &str, payload: &str) -> Result<DecisionReceipt, EscrowError> {
        c.decide_from_payload(&ctx(who), payload)
    }

    #[test]
    fn create_locks_funds_and_returns_first_id() {
        let (mut c, sink) = contract();
        let id = create_default(&mut c);
        assert_eq!(id, EscrowId::new(0));
        assert_eq!(
            c.custody().balance(&addr("hive:sender"), Asset::Hive),
            Amount::from_millis(9_000)
        );
        assert_eq!(c.custody().vault_balance(Asset::Hive), Amount::from_millis(1_000));
        let view = c.get(id).unwrap();
        assert!(!view.closed);
        assert_eq!(view.outcome, Outcome::Pending);
        assert_eq!(sink.codes(), vec!["cr"]);
        assert_eq!(sink.events()[0].tx, TxId::new("tx-hive:sender"));
    }

    #[test]
    fn create_rejections_leave_no_trace() {
        let (mut c, sink) = contract();
        let cases: Vec<(CallContext, &str, ErrorKind)> = vec![
            (ctx("hive:sender"), "x|hive:r|hive:a", ErrorKind::Validation),
            (
                funded_ctx("hive:sender", "0", "hive"),
                "x|hive:r|hive:a",
                ErrorKind::Validation,
            ),
            (
                funded_ctx("hive:sender", "1.000", "btc"),
                "x|hive:r|hive:a",
                ErrorKind::Validation,
            ),
            (
                funded_ctx("hive:sender", "1.000", "hive"),
                "x|hive:sender|hive:a",
                ErrorKind::Validation,
            ),
            (
                funded_ctx("hive:sender", "1.000", "hive"),
                "x|hive:r",
                ErrorKind::Validation,
            ),
            (
                funded_ctx("hive:sender", "99.000", "hive"),
                "x|hive:r|hive:a",
                ErrorKind::DrawFailed,
            ),
        ];
        for (call, raw, kind) in cases {
            let err = c.create_from_payload(&call, raw).unwrap_err();
            assert_eq!(err.kind(), kind, "{raw}");
        }
        assert!(c.store().is_empty());
        assert_eq!(
            c.custody().balance(&addr("hive:sender"), Asset::Hive),
            Amount::from_millis(10_000)
        );
        assert!(sink.events().is_empty());
        assert_eq!(create_default(&mut c), EscrowId::new(0));
    }

    #[test]
    fn explicit_amount_above_limit_is_rejected() {
        let (mut c, _) = contract();
        let request = CreateRequest::new("x", "hive:r", "hive:a").with_amount(Amount::from_millis(2_000));
        let err = c
            .create(&funded_ctx("hive:sender", "1.000", "hive"), request)
            .unwrap_err();
        assert!(matches!(
            err,
            EscrowError::Validation(ValidationError::ExceedsAuthorization { .. })
        ));
        assert!(c.store().is_empty());
    }

    #[test]
    fn explicit_amount_below_limit_locks_that_amount() {
        let (mut c, _) = contract();
        let request = CreateRequest::new("x", "hive:r", "hive:a").with_amount(Amount::from_millis(400));
        let id = c
            .create(&funded_ctx("hive:sender", "1.000", "hive"), request)
            .unwrap();
        assert_eq!(c.get(id).unwrap().amount, "0.400");
        assert_eq!(c.custody().vault_balance(Asset::Hive), Amount::from_millis(400));
    }

    #[test]
    fn two_matching_votes_close_and_pay_receiver() {
        let (mut c, sink) = contract();
        let id = create_default(&mut c);
        let first = decide(&mut c, "hive:sender", "0|release").unwrap();
        assert!(!first.closed());
        let second = decide(&mut c, "hive:receiver", "0|true").unwrap();
        assert!(second.closed());
        let payout = second.payout.unwrap();
        assert_eq!(payout.recipient, addr("hive:receiver"));
        assert_eq!(
            c.custody().balance(&addr("hive:receiver"), Asset::Hive),
            Amount::from_millis(1_000)
        );
        let view = c.get(id).unwrap();
        assert!(view.closed);
        assert_eq!(view.outcome, Outcome::Release);
        assert_eq!(sink.codes(), vec!["cr", "de", "de", "cl"]);
    }

    #[test]
    fn closed_escrow_rejects_further_votes() {
        let (mut c, _) = contract();
        create_default(&mut c);
        decide(&mut c, "hive:sender", "0|refund").unwrap();
        decide(&mut c, "hive:arbitrator", "0|refund").unwrap();
        let before = c.store().entries();
        let err = decide(&mut c, "hive:receiver", "0|refund").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyClosed);
        assert_eq!(c.store().entries(), before);
        assert_eq!(
            c.custody().balance(&addr("hive:sender"), Asset::Hive),
            Amount::from_millis(10_000)
        );
    }

    #[test]
    fn stranger_cannot_vote() {
        let (mut c, _) = contract();
        create_default(&mut c);
        let before = c.store().entries();
        let err = decide(&mut c, "hive:stranger", "0|release").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAParty);
        assert_eq!(c.store().entries(), before);
    }

    #[test]
    fn unknown_escrow_is_not_found() {
        let (mut c, _) = contract();
        let err = decide(&mut c, "hive:sender", "5|release").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(c.get(EscrowId::new(5)).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn revised_vote_counts_once() {
        let (mut c, _) = contract();
        create_default(&mut c);
        decide(&mut c, "hive:sender", "0|refund").unwrap();
        let r = decide(&mut c, "hive:sender", "0|release").unwrap();
        assert_eq!(r.previous, Decision::Refund);
        assert!(!r.closed());
        let r = decide(&mut c, "hive:arbitrator", "0|refund").unwrap();
        assert!(!r.closed());
        let r = decide(&mut c, "hive:receiver", "0|release").unwrap();
        assert!(r.closed());
        assert_eq!(c.get(EscrowId::new(0)).unwrap().outcome, Outcome::Release);
    }

    #[test]
    fn final_policy_rejects_revision() {
        let (mut c, _) = contract_with(EscrowConfig {
            vote_policy: VotePolicy::FinalOnceCast,
            ..EscrowConfig::default()
        });
        create_default(&mut c);
        decide(&mut c, "hive:sender", "0|refund").unwrap();
        let err = decide(&mut c, "hive:sender", "0|release").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VoteAlreadyCast);
        assert_eq!(
            c.get(EscrowId::new(0)).unwrap().creator.decision,
            Decision::Refund
        );
    }

    #[test]
    fn get_payload_renders_json() {
        let (mut c, _) = contract();
        create_default(&mut c);
        let json: serde_json::Value =
            serde_json::from_str(&c.get_from_payload("0").unwrap()).unwrap();
        assert_eq!(json["n"], "escrow");
        assert_eq!(json["am"], "1.000");
        assert!(c.get_from_payload("").is_err());
    }

    #[test]
    fn corrupt_decisions_fail_loudly() {
        let (mut c, _) = contract();
        create_default(&mut c);
        let mut entries = c.store().entries();
        entries.insert("e:0|d".to_string(), "090".to_string());
        let (_, custody) = c.into_parts();
        let mut c: Contract = EscrowContract::new(
            MemoryStore::from_entries(entries),
            custody,
            EscrowConfig::default(),
        );
        assert_eq!(c.get(EscrowId::new(0)).unwrap_err().kind(), ErrorKind::CorruptState);
        let err = decide(&mut c, "hive:sender", "0|release").unwrap_err();
        assert!(err.is_fatal());
    }

    // ── Failing test doubles ───────────────────────────────────────────

    /// Custody that draws normally but refuses every payout.
    #[derive(Default)]
    struct NoPayoutCustody {
        inner: MemoryCustody,
        transfers: usize,
    }

    impl Custody for NoPayoutCustody {
        fn draw(&mut self, from: &Address, amount: Amount, asset: Asset) -> Result<(), CustodyError> {
            self.inner.draw(from, amount, asset)
        }

        fn transfer(&mut self, to: &Address, amount: Amount, asset: Asset) -> Result<(), CustodyError> {
            self.transfers += 1;
            Err(CustodyError::Rejected {
                recipient: to.clone(),
                amount,
                asset,
                reason: "host offline".to_string(),
            })
        }
    }

    #[test]
    fn refused_payout_keeps_escrow_open() {
        let mut custody = NoPayoutCustody::default();
        custody
            .inner
            .credit(&addr("hive:sender"), Amount::from_millis(1_000), Asset::Hive)
            .unwrap();
        let sink = RecordingSink::new();
        let mut c = EscrowContract::new(MemoryStore::new(), custody, EscrowConfig::default())
            .with_event_sink(Arc::new(sink.clone()));
        c.create_from_payload(
            &funded_ctx("hive:sender", "1.000", "hive"),
            "x|hive:receiver|hive:arbitrator",
        )
        .unwrap();
        c.decide_from_payload(&ctx("hive:sender"), "0|release").unwrap();

        let err = c
            .decide_from_payload(&ctx("hive:receiver"), "0|release")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CustodyTransferFailed);
        let view = c.get(EscrowId::new(0)).unwrap();
        assert!(!view.closed);
        assert_eq!(view.receiver.decision, Decision::Unset);
        assert_eq!(c.custody().inner.vault_balance(Asset::Hive), Amount::from_millis(1_000));
        assert_eq!(c.custody().transfers, 1);
        assert_eq!(sink.codes(), vec!["cr", "de"]);
    }

    /// Store whose batch commits fail while armed.
    #[derive(Default)]
    struct BrittleStore {
        inner: MemoryStore,
        fail_commits: Cell<bool>,
    }

    impl KvStore for BrittleStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
            self.inner.set(key, value)
        }

        fn apply(&mut self, writes: Vec<(String, String)>) -> Result<(), StoreError> {
            if self.fail_commits.get() {
                return Err(StoreError::Io {
                    path: "brittle".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
            self.inner.apply(writes)
        }
    }

    #[test]
    fn failed_commit_returns_drawn_funds() {
        let mut custody = MemoryCustody::new();
        custody
            .credit(&addr("hive:sender"), Amount::from_millis(1_000), Asset::Hive)
            .unwrap();
        let store = BrittleStore {
            fail_commits: Cell::new(true),
            ..BrittleStore::default()
        };
        let mut c = EscrowContract::new(store, custody, EscrowConfig::default());
        let err = c
            .create_from_payload(
                &funded_ctx("hive:sender", "1.000", "hive"),
                "x|hive:receiver|hive:arbitrator",
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(c.store().inner.is_empty());
        assert_eq!(
            c.custody().balance(&addr("hive:sender"), Asset::Hive),
            Amount::from_millis(1_000)
        );
        assert_eq!(c.custody().vault_balance(Asset::Hive), Amount::ZERO);
    }

    #[test]
    fn failed_commit_after_closing_vote_reverses_the_payout() {
        let mut custody = MemoryCustody::new();
        custody
            .credit(&addr("hive:sender"), Amount::from_millis(2_000), Asset::Hive)
            .unwrap();
        let sink = RecordingSink::new();
        let mut c = EscrowContract::new(BrittleStore::default(), custody, EscrowConfig::default())
            .with_event_sink(Arc::new(sink.clone()));
        for name in ["first", "second"] {
            c.create_from_payload(
                &funded_ctx("hive:sender", "1.000", "hive"),
                &format!("{name}|hive:receiver|hive:arbitrator"),
            )
            .unwrap();
        }
        c.decide_from_payload(&ctx("hive:sender"), "0|release").unwrap();

        c.store().fail_commits.set(true);
        let err = c
            .decide_from_payload(&ctx("hive:receiver"), "0|release")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(!c.get(EscrowId::new(0)).unwrap().closed);
        assert_eq!(c.custody().balance(&addr("hive:receiver"), Asset::Hive), Amount::ZERO);
        assert_eq!(c.custody().vault_balance(Asset::Hive), Amount::from_millis(2_000));

        c.store().fail_commits.set(false);
        let receipt = c
            .decide_from_payload(&ctx("hive:arbitrator"), "0|release")
            .unwrap();
        assert!(receipt.closed());
        let err = c
            .decide_from_payload(&ctx("hive:receiver"), "0|release")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyClosed);

        assert_eq!(
            c.custody().balance(&addr("hive:receiver"), Asset::Hive),
            Amount::from_millis(1_000)
        );
        assert_eq!(c.custody().vault_balance(Asset::Hive), Amount::from_millis(1_000));
        assert!(!c.get(EscrowId::new(1)).unwrap().closed);
        assert_eq!(sink.codes(), vec!["cr", "cr", "de", "de", "cl"]);
    }

    #[test]
    fn damaged_counter_only_blocks_creation() {
        let (mut c, _) = contract();
        create_default(&mut c);
        let mut entries = c.store().entries();
        entries.insert("cnt:e".to_string(), "not-a-number".to_string());
        let (_, custody) = c.into_parts();
        let mut c: Contract = EscrowContract::new(
            MemoryStore::from_entries(entries),
            custody,
            EscrowConfig::default(),
        );

        assert_eq!(c.get(EscrowId::new(0)).unwrap().name, "escrow");
        decide(&mut c, "hive:sender", "0|refund").unwrap();
        assert!(decide(&mut c, "hive:receiver", "0|refund").unwrap().closed());

        let err = c
            .create_from_payload(
                &funded_ctx("hive:sender", "1.000", "hive"),
                "again|hive:receiver|hive:arbitrator",
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptState);
    }
}
