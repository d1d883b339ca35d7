//! Core types shared across the bank services
//!
//! Amounts are integer minor currency units (`i64`). A balance is always
//! non-negative; transaction amounts are always positive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Bank identifier, normalized to lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BankId(String);

impl BankId {
    /// Create new bank ID (lowercased)
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().to_lowercase())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account identifier, normalized to uppercase for case-insensitive lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create new account ID (uppercased)
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().to_uppercase())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a ledger mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Money leaving the account
    Debit,
    /// Money entering the account
    Credit,
    /// Debit against an external biller
    BillPayment,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Debit => "DEBIT",
            Direction::Credit => "CREDIT",
            Direction::BillPayment => "BILL_PAYMENT",
        };
        write!(f, "{}", s)
    }
}

/// Account snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Owning bank
    pub bank_id: BankId,

    /// Account identifier within the bank
    pub account_id: AccountId,

    /// Account holder name
    pub owner_name: String,

    /// Balance in minor currency units, never negative
    pub balance: i64,
}

/// One entry in a bank's append-only transaction log
///
/// Immutable once written. The counterparty fields loosely pair this record
/// with a sibling record in the other bank's log; there is no cross-log
/// reference beyond the shared semantic fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique record ID
    pub id: Uuid,

    /// Bank that owns this log entry
    pub bank_id: BankId,

    /// Account whose balance this record reflects
    pub account_id: AccountId,

    /// Debit, credit, or bill payment
    pub direction: Direction,

    /// Amount moved, always positive
    pub amount: i64,

    /// Other side of the transfer (account or biller code)
    pub counterparty_account: String,

    /// Other side's bank ("external" for billers)
    pub counterparty_bank: String,

    /// Human-readable summary
    pub description: String,

    /// Written at the moment the ledger mutation is applied
    pub timestamp: DateTime<Utc>,

    /// Caller-supplied deduplication key, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,

    /// Biller reference number for bill payments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
}
