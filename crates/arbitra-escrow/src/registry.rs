//! # Escrow Registry
//!
//! The addressable collection of escrow records plus the identifier
//! allocator.
//!
//! ## Identifier Allocation
//!
//! The next identifier lives in the store under [`COUNTER_KEY`] and is read
//! once into an [`IdAllocator`] owned by the registry. There is no ambient
//! counter: whoever builds a registry hands it the allocator, and every
//! allocation stages the advanced counter through the same store as the
//! record it belongs to. When the store is a
//! [`Journal`](arbitra_host::Journal) a failed creation discards both, so
//! identifiers stay strictly increasing and are never reused.

use arbitra_core::{Amount, Asset, EscrowId, TxId};
use arbitra_host::KvStore;

use crate::codec::{self, COUNTER_KEY};
use crate::error::EscrowError;
use crate::record::{EscrowRecord, Parties};

// ── Allocator ──────────────────────────────────────────────────────────

/// Owner of the next unused escrow identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next: EscrowId,
}

impl IdAllocator {
    /// An allocator starting at `next`.
    pub fn starting_at(next: EscrowId) -> Self {
        Self { next }
    }

    /// Read the persisted counter. An absent counter starts at zero.
    pub fn load<S: KvStore + ?Sized>(store: &S) -> Result<Self, EscrowError> {
        let next = match store.get(COUNTER_KEY)? {
            Some(raw) => codec::decode_counter(&raw)?,
            None => EscrowId::FIRST,
        };
        Ok(Self { next })
    }

    /// The identifier the next call to [`IdAllocator::next`] returns.
    pub fn peek(&self) -> EscrowId {
        self.next
    }

    /// Hand out the next identifier and advance.
    pub fn next(&mut self) -> Result<EscrowId, EscrowError> {
        let id = self.next;
        self.next = id
            .checked_next()
            .ok_or_else(|| EscrowError::corrupt(COUNTER_KEY, "escrow id space exhausted"))?;
        Ok(id)
    }
}

// ── Registry ───────────────────────────────────────────────────────────

/// Escrow records over a key-value store.
#[derive(Debug)]
pub struct Registry<S: KvStore> {
    store: S,
    ids: IdAllocator,
}

impl<S: KvStore> Registry<S> {
    /// Build a registry from a store and an explicitly owned allocator.
    pub fn new(store: S, ids: IdAllocator) -> Self {
        Self { store, ids }
    }

    /// Build a registry whose allocator is read from `store`.
    pub fn open(store: S) -> Result<Self, EscrowError> {
        let ids = IdAllocator::load(&store)?;
        Ok(Self::new(store, ids))
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// The identifier the next creation receives.
    pub fn peek_id(&self) -> EscrowId {
        self.ids.peek()
    }

    /// Allocate an identifier and stage the advanced counter.
    pub fn allocate_id(&mut self) -> Result<EscrowId, EscrowError> {
        let id = self.ids.next()?;
        self.store
            .set(COUNTER_KEY, codec::encode_counter(self.ids.peek()))?;
        Ok(id)
    }

    /// Allocate an identifier and persist a fresh, open record under it.
    pub fn create(
        &mut self,
        name: String,
        parties: Parties,
        amount: Amount,
        asset: Asset,
        created_tx: TxId,
    ) -> Result<EscrowRecord, EscrowError> {
        let id = self.allocate_id()?;
        if self.store.get(&codec::header_key(id))?.is_some() {
            return Err(EscrowError::DuplicateCreation { escrow_id: id });
        }
        let record = EscrowRecord::open(id, name, parties, amount, asset, created_tx);
        self.save(&record)?;
        tracing::debug!(escrow_id = %id, "escrow record staged");
        Ok(record)
    }

    /// Read a record back. See [`load_record`].
    pub fn load(&self, id: EscrowId) -> Result<EscrowRecord, EscrowError> {
        load_record(&self.store, id)
    }

    /// Overwrite the full persisted representation of `record`.
    pub fn save(&mut self, record: &EscrowRecord) -> Result<(), EscrowError> {
        save_record(&mut self.store, record)
    }
}

// ── Record access ──────────────────────────────────────────────────────

/// Read a record straight from `store`.
///
/// Only the record's own keys are read; the id counter is not consulted,
/// so reads and decisions work even when `cnt:e` is damaged.
///
/// # Errors
///
/// - [`EscrowError::NotFound`] if no header exists at `id`,
/// - [`EscrowError::CorruptState`] if the header exists but the record
///   does not decode.
pub fn load_record<S: KvStore + ?Sized>(
    store: &S,
    id: EscrowId,
) -> Result<EscrowRecord, EscrowError> {
    let Some(header) = store.get(&codec::header_key(id))? else {
        return Err(EscrowError::NotFound { escrow_id: id });
    };
    let decisions_key = codec::decisions_key(id);
    let Some(decisions) = store.get(&decisions_key)? else {
        return Err(EscrowError::corrupt(decisions_key, "decision entry missing"));
    };
    codec::decode_record(id, &header, &decisions)
}

/// Write every key of `record` to `store`.
pub fn save_record<S: KvStore + ?Sized>(
    store: &mut S,
    record: &EscrowRecord,
) -> Result<(), EscrowError> {
    for (key, value) in codec::encode_record(record) {
        store.set(&key, value)?;
    }
    Ok(())
}
