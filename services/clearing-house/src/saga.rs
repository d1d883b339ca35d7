//! The inter-bank transfer saga
//!
//! States: `Initiated → Debited → Completed`, with failure exits
//! `DebitFailed` (nothing moved) and `CreditFailedAfterDebit` (debited but
//! not credited: the alarmable, reconciliation-requiring case). There is
//! no global lock or distributed transaction: each leg is atomic inside its
//! bank, and retries are safe because both legs carry idempotency keys
//! derived from the transfer id.

use crate::client::{BankClient, CreditLeg, DebitLeg, LegFailure};
use crate::error::{ClearingError, Result, Stage};
use crate::retry::RetryStrategy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Saga state of one inter-bank transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferState {
    Initiated,
    Debited,
    Completed,
    DebitFailed,
    CreditFailedAfterDebit,
}

/// Caller's transfer request
#[derive(Debug, Clone, Deserialize)]
pub struct TransferIntent {
    pub from_bank: String,
    pub to_bank: String,
    pub from_account: String,
    pub to_account: String,
    pub amount: i64,
}

/// Terminal result of a completed saga
#[derive(Debug, Clone, Serialize)]
pub struct TransferOutcome {
    pub transfer_id: Uuid,
    pub state: TransferState,
    pub from_bank: String,
    pub to_bank: String,
    pub from_account: String,
    pub to_account: String,
    pub amount: i64,
}

/// Stateless orchestrator over a static bank registry
pub struct ClearingSaga {
    /// bank name -> base URL of its service
    registry: HashMap<String, String>,
    client: Arc<dyn BankClient>,
    retry: RetryStrategy,
}

impl ClearingSaga {
    pub fn new(
        registry: HashMap<String, String>,
        client: Arc<dyn BankClient>,
        retry: RetryStrategy,
    ) -> Self {
        let registry = registry
            .into_iter()
            .map(|(bank, url)| (bank.to_lowercase(), url))
            .collect();
        Self {
            registry,
            client,
            retry,
        }
    }

    fn endpoint(&self, bank: &str) -> Result<&str> {
        self.registry
            .get(&bank.to_lowercase())
            .map(String::as_str)
            .ok_or_else(|| ClearingError::UnknownBank(bank.to_string()))
    }

    /// Drive one inter-bank transfer to a terminal state
    pub async fn execute(&self, intent: &TransferIntent) -> Result<TransferOutcome> {
        if intent.amount <= 0 {
            return Err(ClearingError::InvalidAmount(intent.amount));
        }
        let from_url = self.endpoint(&intent.from_bank)?;
        let to_url = self.endpoint(&intent.to_bank)?;

        let transfer_id = Uuid::new_v4();
        info!(
            %transfer_id,
            from_bank = %intent.from_bank,
            to_bank = %intent.to_bank,
            amount = intent.amount,
            state = ?TransferState::Initiated,
            "inter-bank transfer initiated"
        );

        // Receiver pre-check. Nothing has mutated yet, so any failure here
        // is a plain, safe-to-report rejection; it also shrinks the window
        // where a debit lands and the paired credit cannot logically apply.
        let receiver_exists = self
            .retry
            .run(
                || self.client.account_exists(to_url, &intent.to_account),
                "receiver lookup",
            )
            .await
            .map_err(|e| ClearingError::RemoteCallFailed {
                bank: intent.to_bank.clone(),
                reason: e.to_string(),
            })?;
        if !receiver_exists {
            return Err(ClearingError::ReceiverNotFound {
                account: intent.to_account.clone(),
                bank: intent.to_bank.clone(),
            });
        }

        // Debit leg. Safe to retry: the key dedupes re-applied debits.
        let debit_leg = DebitLeg {
            from_account: intent.from_account.clone(),
            to_account: intent.to_account.clone(),
            amount: intent.amount,
            from_bank: intent.from_bank.clone(),
            to_bank: intent.to_bank.clone(),
            idempotency_key: format!("{}:debit", transfer_id),
        };
        match self
            .retry
            .run(|| self.client.debit(from_url, &debit_leg), "debit leg")
            .await
        {
            Ok(()) => {
                info!(%transfer_id, state = ?TransferState::Debited, "debit leg confirmed");
            }
            Err(LegFailure::Rejected { status, detail }) => {
                warn!(
                    %transfer_id,
                    status,
                    state = ?TransferState::DebitFailed,
                    "debit leg rejected, nothing moved"
                );
                return Err(ClearingError::DebitFailed {
                    transfer_id,
                    reason: format!("HTTP {}: {}", status, detail),
                });
            }
            Err(LegFailure::Unknown(reason)) => {
                // The debit may have applied. Claiming "money never left the
                // sender" would be wrong, so this is flagged for
                // reconciliation rather than reported as a clean rejection.
                error!(
                    %transfer_id,
                    from_bank = %intent.from_bank,
                    to_bank = %intent.to_bank,
                    amount = intent.amount,
                    %reason,
                    "debit leg outcome unknown after retries, reconciliation required"
                );
                return Err(ClearingError::InconsistentTransfer {
                    transfer_id,
                    from_bank: intent.from_bank.clone(),
                    to_bank: intent.to_bank.clone(),
                    amount: intent.amount,
                    stage: Stage::Debit,
                    reason: format!("debit outcome unknown: {}", reason),
                });
            }
        }

        // Credit leg. Once the debit is confirmed the transfer can only be
        // completed or compensated, never cancelled; retry-credit-first is
        // the compensation policy here.
        let credit_leg = CreditLeg {
            account_id: intent.to_account.clone(),
            amount: intent.amount,
            from_bank: intent.from_bank.clone(),
            from_account: intent.from_account.clone(),
            idempotency_key: format!("{}:credit", transfer_id),
        };
        match self
            .retry
            .run(|| self.client.credit(to_url, &credit_leg), "credit leg")
            .await
        {
            Ok(()) => {
                info!(%transfer_id, state = ?TransferState::Completed, "inter-bank transfer completed");
                Ok(TransferOutcome {
                    transfer_id,
                    state: TransferState::Completed,
                    from_bank: intent.from_bank.clone(),
                    to_bank: intent.to_bank.clone(),
                    from_account: intent.from_account.clone(),
                    to_account: intent.to_account.clone(),
                    amount: intent.amount,
                })
            }
            Err(failure) => {
                error!(
                    %transfer_id,
                    from_bank = %intent.from_bank,
                    to_bank = %intent.to_bank,
                    amount = intent.amount,
                    %failure,
                    state = ?TransferState::CreditFailedAfterDebit,
                    "credit leg failed after debit, reconciliation required"
                );
                Err(ClearingError::InconsistentTransfer {
                    transfer_id,
                    from_bank: intent.from_bank.clone(),
                    to_bank: intent.to_bank.clone(),
                    amount: intent.amount,
                    stage: Stage::Credit,
                    reason: failure.to_string(),
                })
            }
        }
    }
}
