//! Per-bank ledger core
//!
//! Each bank service owns one [`TransferEngine`]: an account ledger, an
//! append-only transaction log, and an idempotency guard. The engine exposes
//! the two atomic legs (`debit`, `credit`) the clearing house composes into
//! inter-bank transfers, plus same-bank transfers and bill payments.
//!
//! # Invariants
//!
//! - Balances never go negative: debits are conditional, checked and applied
//!   as one atomic step per account
//! - Transaction records are append-only: never modified or deleted
//! - At most one ledger mutation per idempotency key

#![forbid(unsafe_code)]

pub mod billers;
pub mod engine;
pub mod error;
pub mod idempotency;
pub mod ledger;
pub mod txlog;
pub mod types;

// Re-exports
pub use billers::{Biller, BillerCatalog, CatalogError};
pub use engine::{PaymentResult, TransferEngine};
pub use error::{Error, Result};
pub use idempotency::Outcome;
pub use ledger::AccountLedger;
pub use txlog::TransactionLog;
pub use types::{Account, AccountId, BankId, Direction, TransactionRecord};
