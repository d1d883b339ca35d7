//! Idempotency guard: at-most-once execution per caller-supplied key
//!
//! The find-or-insert must itself be atomic, otherwise two concurrent
//! requests with the same fresh key both observe "no record" and debit
//! twice. The guard executes the operation while holding the key's vacant
//! map entry, so the second concurrent writer blocks on the shard and then
//! observes the first writer's record as a duplicate.

use crate::error::Result;
use crate::types::TransactionRecord;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::info;

/// Result of an idempotency-guarded operation
#[derive(Debug, Clone)]
pub enum Outcome {
    /// First execution of this key; the operation ran
    Fresh(TransactionRecord),
    /// Key seen before; the original record is returned, nothing re-executed
    Duplicate(TransactionRecord),
}

impl Outcome {
    /// The transaction record, regardless of freshness
    pub fn record(&self) -> &TransactionRecord {
        match self {
            Outcome::Fresh(r) | Outcome::Duplicate(r) => r,
        }
    }

    /// Whether this was a replayed request
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Outcome::Duplicate(_))
    }
}

/// Deduplicates externally retried requests within one bank
#[derive(Default)]
pub struct IdempotencyGuard {
    seen: DashMap<String, TransactionRecord>,
}

impl IdempotencyGuard {
    /// Create an empty guard
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute `op` at most once for `key`
    ///
    /// Without a key the operation runs unguarded. A failed operation
    /// reserves nothing: the key stays free, so the caller may retry.
    pub fn run<F>(&self, key: Option<&str>, op: F) -> Result<Outcome>
    where
        F: FnOnce() -> Result<TransactionRecord>,
    {
        let Some(key) = key else {
            return op().map(Outcome::Fresh);
        };

        // Entry is held for the duration of `op`, making check + reserve
        // one atomic unit with the ledger mutation inside `op`.
        match self.seen.entry(key.to_string()) {
            Entry::Occupied(existing) => {
                info!(idempotency_key = %key, "duplicate request, returning original result");
                Ok(Outcome::Duplicate(existing.get().clone()))
            }
            Entry::Vacant(slot) => {
                let record = op()?;
                slot.insert(record.clone());
                Ok(Outcome::Fresh(record))
            }
        }
    }

    /// Look up the record previously written under `key`
    pub fn find(&self, key: &str) -> Option<TransactionRecord> {
        self.seen.get(key).map(|r| r.clone())
    }
}
