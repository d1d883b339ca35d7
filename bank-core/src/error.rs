use thiserror::Error;

/// Errors from ledger and transfer-engine operations
///
/// All variants are local validation failures: they are raised before any
/// mutation, so reporting them to the caller is always safe. A duplicate
/// idempotent request is not an error (see [`crate::idempotency::Outcome`]).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Biller not supported: {0}")]
    UnsupportedBiller(String),

    #[error("Amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Balance overflow on account {0}")]
    BalanceOverflow(String),
}

pub type Result<T> = std::result::Result<T, Error>;
