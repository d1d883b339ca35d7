//! Bank client seam
//!
//! The clearing house talks to bank services through [`BankClient`], so the
//! saga can be exercised against mocks without a network. The HTTP
//! implementation classifies every failure by what is known about the
//! remote ledger: a 4xx is a definite rejection (nothing applied), while
//! timeouts, connection errors, and 5xx responses are unknown-outcome: the
//! leg may or may not have applied, and only an idempotent retry is safe.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Failure of one leg call, classified by remote-ledger knowledge
#[derive(Debug, Clone, Error)]
pub enum LegFailure {
    /// Bank definitively rejected the leg; its ledger was not mutated
    #[error("rejected by bank (HTTP {status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// Timeout, connection error, or 5xx: the leg may have applied
    #[error("outcome unknown: {0}")]
    Unknown(String),
}

impl LegFailure {
    /// Only unknown-outcome failures are worth an idempotent retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, LegFailure::Unknown(_))
    }
}

/// Outbound debit leg payload, posted to the sending bank's `/transfer`
#[derive(Debug, Clone, Serialize)]
pub struct DebitLeg {
    pub from_account: String,
    pub to_account: String,
    pub amount: i64,
    pub from_bank: String,
    pub to_bank: String,
    pub idempotency_key: String,
}

/// Incoming credit leg payload, posted to the receiving bank's `/internal/credit`
#[derive(Debug, Clone, Serialize)]
pub struct CreditLeg {
    pub account_id: String,
    pub amount: i64,
    pub from_bank: String,
    pub from_account: String,
    pub idempotency_key: String,
}

/// Narrow interface the saga needs from a bank service
#[async_trait]
pub trait BankClient: Send + Sync {
    /// Whether `account_id` exists at the bank behind `base_url`
    async fn account_exists(
        &self,
        base_url: &str,
        account_id: &str,
    ) -> std::result::Result<bool, LegFailure>;

    /// Execute the debit leg at the sending bank
    async fn debit(&self, base_url: &str, leg: &DebitLeg)
        -> std::result::Result<(), LegFailure>;

    /// Execute the credit leg at the receiving bank
    async fn credit(
        &self,
        base_url: &str,
        leg: &CreditLeg,
    ) -> std::result::Result<(), LegFailure>;
}

/// HTTP implementation with an explicit per-request timeout
pub struct HttpBankClient {
    http: reqwest::Client,
}

impl HttpBankClient {
    pub fn new(call_timeout: Duration) -> Result<Self, anyhow::Error> {
        let http = reqwest::Client::builder().timeout(call_timeout).build()?;
        Ok(Self { http })
    }

    async fn post_leg<B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> std::result::Result<(), LegFailure> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| LegFailure::Unknown(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status.is_client_error() {
            let detail = response.text().await.unwrap_or_default();
            Err(LegFailure::Rejected {
                status: status.as_u16(),
                detail,
            })
        } else {
            Err(LegFailure::Unknown(format!("HTTP {}", status)))
        }
    }
}

#[async_trait]
impl BankClient for HttpBankClient {
    async fn account_exists(
        &self,
        base_url: &str,
        account_id: &str,
    ) -> std::result::Result<bool, LegFailure> {
        let url = format!("{}/balance/{}", base_url, account_id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LegFailure::Unknown(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if status.as_u16() == 404 {
            Ok(false)
        } else {
            Err(LegFailure::Unknown(format!("HTTP {}", status)))
        }
    }

    async fn debit(
        &self,
        base_url: &str,
        leg: &DebitLeg,
    ) -> std::result::Result<(), LegFailure> {
        self.post_leg(&format!("{}/transfer", base_url), leg).await
    }

    async fn credit(
        &self,
        base_url: &str,
        leg: &CreditLeg,
    ) -> std::result::Result<(), LegFailure> {
        self.post_leg(&format!("{}/internal/credit", base_url), leg)
            .await
    }
}
