//! # Shared Contract Handle
//!
//! A contract instance is a single-writer state machine: a decision reads
//! the record, records the vote, evaluates consensus and pays out, and two
//! decisions interleaving on the same escrow could both see it open and
//! both pay out. Hosts that run calls from several threads share the
//! contract through [`SharedEscrow`], which holds one mutex for the whole
//! read-decide-evaluate-resolve sequence of every call.

use std::sync::Arc;

use parking_lot::Mutex;

use arbitra_core::EscrowId;
use arbitra_host::{CallContext, Custody, KvStore};

use crate::contract::{DecisionReceipt, EscrowContract};
use crate::error::EscrowError;
use crate::intake::{CreateRequest, DecisionRequest};
use crate::view::EscrowView;

/// Cloneable, thread-safe handle to one contract.
pub struct SharedEscrow<S: KvStore, C: Custody> {
    inner: Arc<Mutex<EscrowContract<S, C>>>,
}

impl<S: KvStore, C: Custody> Clone for SharedEscrow<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KvStore, C: Custody> SharedEscrow<S, C> {
    /// Take ownership of a contract.
    pub fn new(contract: EscrowContract<S, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(contract)),
        }
    }

    /// See [`EscrowContract::create`].
    pub fn create(
        &self,
        ctx: &CallContext,
        request: CreateRequest,
    ) -> Result<EscrowId, EscrowError> {
        self.inner.lock().create(ctx, request)
    }

    /// See [`EscrowContract::create_from_payload`].
    pub fn create_from_payload(
        &self,
        ctx: &CallContext,
        raw: &str,
    ) -> Result<EscrowId, EscrowError> {
        self.inner.lock().create_from_payload(ctx, raw)
    }

    /// See [`EscrowContract::decide`].
    pub fn decide(
        &self,
        ctx: &CallContext,
        request: DecisionRequest,
    ) -> Result<DecisionReceipt, EscrowError> {
        self.inner.lock().decide(ctx, request)
    }

    /// See [`EscrowContract::decide_from_payload`].
    pub fn decide_from_payload(
        &self,
        ctx: &CallContext,
        raw: &str,
    ) -> Result<DecisionReceipt, EscrowError> {
        self.inner.lock().decide_from_payload(ctx, raw)
    }

    /// See [`EscrowContract::get`].
    pub fn get(&self, escrow_id: EscrowId) -> Result<EscrowView, EscrowError> {
        self.inner.lock().get(escrow_id)
    }

    /// Run `f` with exclusive access to the contract.
    pub fn with<R>(&self, f: impl FnOnce(&mut EscrowContract<S, C>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
