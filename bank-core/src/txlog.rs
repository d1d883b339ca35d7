//! Append-only transaction log
//!
//! The only mutation is `append`; records are never updated or deleted.
//! History queries return the newest records first, capped to bound response
//! size rather than for correctness.

use crate::types::{AccountId, TransactionRecord};
use parking_lot::RwLock;
use uuid::Uuid;

/// Maximum number of records returned by a history query
pub const HISTORY_LIMIT: usize = 100;

/// Per-bank append-only record of ledger-affecting events
#[derive(Default)]
pub struct TransactionLog {
    records: RwLock<Vec<TransactionRecord>>,
}

impl TransactionLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, returning its ID
    pub fn append(&self, record: TransactionRecord) -> Uuid {
        let id = record.id;
        self.records.write().push(record);
        id
    }

    /// Up to [`HISTORY_LIMIT`] most recent records for an account, newest first
    pub fn history(&self, account_id: &AccountId) -> Vec<TransactionRecord> {
        let records = self.records.read();
        records
            .iter()
            .rev()
            .filter(|r| &r.account_id == account_id)
            .take(HISTORY_LIMIT)
            .cloned()
            .collect()
    }

    /// Find the record written under a caller-supplied idempotency key
    pub fn find_by_idempotency_key(&self, key: &str) -> Option<TransactionRecord> {
        let records = self.records.read();
        records
            .iter()
            .find(|r| r.idempotency_key.as_deref() == Some(key))
            .cloned()
    }

    /// Total number of records in the log
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BankId, Direction};
    use chrono::Utc;

    fn record(account: &str, amount: i64, key: Option<&str>) -> TransactionRecord {
        TransactionRecord {
            id: Uuid::new_v4(),
            bank_id: BankId::new("bpi"),
            account_id: AccountId::new(account),
            direction: Direction::Debit,
            amount,
            counterparty_account: "X".to_string(),
            counterparty_bank: "bpi".to_string(),
            description: "test".to_string(),
            timestamp: Utc::now(),
            idempotency_key: key.map(str::to_string),
            reference_number: None,
        }
    }

    #[test]
    fn test_history_newest_first() {
        let log = TransactionLog::new();
        log.append(record("A1", 1, None));
        log.append(record("A1", 2, None));
        log.append(record("A2", 3, None));

        let history = log.history(&AccountId::new("A1"));
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].amount, 2);
        assert_eq!(history[1].amount, 1);
    }

    #[test]
    fn test_history_capped() {
        let log = TransactionLog::new();
        for i in 0..150 {
            log.append(record("A1", i, None));
        }
        let history = log.history(&AccountId::new("A1"));
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].amount, 149);
    }

    #[test]
    fn test_find_by_idempotency_key() {
        let log = TransactionLog::new();
        log.append(record("A1", 1, Some("key-1")));

        assert!(log.find_by_idempotency_key("key-1").is_some());
        assert!(log.find_by_idempotency_key("key-2").is_none());
    }
}
