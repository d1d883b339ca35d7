//! Clearing house: stateless orchestrator for inter-bank transfers
//!
//! An inter-bank transfer is a two-leg saga: debit the sending bank, then
//! credit the receiving bank. The two legs never share a transaction, so
//! consistency comes from per-leg atomicity plus idempotent retry. Every
//! transfer carries one transfer id, reused as the idempotency key of both
//! legs. A credit leg that cannot be confirmed after the debit landed is the
//! one failure that must never be reported as an ordinary error; it is
//! surfaced distinctly and flagged for reconciliation.

pub mod client;
pub mod config;
pub mod error;
pub mod retry;
pub mod routes;
pub mod saga;

pub use client::{BankClient, HttpBankClient, LegFailure};
pub use error::{ClearingError, Result};
pub use saga::{ClearingSaga, TransferIntent, TransferOutcome, TransferState};
