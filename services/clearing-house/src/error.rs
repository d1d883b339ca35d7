use thiserror::Error;
use uuid::Uuid;

/// Which leg of the saga an unconfirmed failure happened on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Debit,
    Credit,
}

#[derive(Error, Debug)]
pub enum ClearingError {
    #[error("Unknown bank: {0}")]
    UnknownBank(String),

    #[error("Amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Receiving account {account} not found at bank {bank}")]
    ReceiverNotFound { account: String, bank: String },

    #[error("Debit leg rejected for transfer {transfer_id}: {reason}")]
    DebitFailed { transfer_id: Uuid, reason: String },

    #[error("Remote call to bank {bank} failed before any mutation: {reason}")]
    RemoteCallFailed { bank: String, reason: String },

    /// The alarmable case: a ledger was (or may have been) mutated and the
    /// transfer did not complete. Carries everything reconciliation needs.
    #[error(
        "Inconsistent transfer {transfer_id} ({amount} from {from_bank} to {to_bank}): {reason}"
    )]
    InconsistentTransfer {
        transfer_id: Uuid,
        from_bank: String,
        to_bank: String,
        amount: i64,
        stage: Stage,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ClearingError>;
