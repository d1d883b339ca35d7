//! Saga tests against an in-process mock bank network
//!
//! The mock implements the `BankClient` seam over two real per-bank engines,
//! with failure injection on the credit leg to exercise the inconsistency
//! and retry paths without a network.

use async_trait::async_trait;
use bank_core::{AccountId, BankId, BillerCatalog, TransferEngine};
use clearing_house::client::{BankClient, CreditLeg, DebitLeg, LegFailure};
use clearing_house::error::Stage;
use clearing_house::retry::{RetryConfig, RetryStrategy};
use clearing_house::{ClearingError, ClearingSaga, TransferIntent, TransferState};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

const BPI_URL: &str = "http://bpi";
const GCASH_URL: &str = "http://gcash";

struct MockNetwork {
    banks: HashMap<String, Arc<TransferEngine>>,
    /// Fail this many credit calls with an unknown outcome before recovering
    credit_unknowns: AtomicU32,
    /// Whether a failed credit call still applied at the bank (timeout
    /// raced the response, the classic partial-failure case)
    apply_before_unknown: bool,
}

impl MockNetwork {
    fn new() -> Self {
        let bpi = TransferEngine::new(BankId::new("bpi"), BillerCatalog::empty());
        bpi.provision_account(AccountId::new("BPI001"), "Alice Santos", 50_000);

        let gcash = TransferEngine::new(BankId::new("gcash"), BillerCatalog::empty());
        gcash.provision_account(AccountId::new("GCASH001"), "Carla Cruz", 25_000);

        let mut banks = HashMap::new();
        banks.insert(BPI_URL.to_string(), Arc::new(bpi));
        banks.insert(GCASH_URL.to_string(), Arc::new(gcash));

        Self {
            banks,
            credit_unknowns: AtomicU32::new(0),
            apply_before_unknown: false,
        }
    }

    fn bank(&self, base_url: &str) -> &TransferEngine {
        &self.banks[base_url]
    }

    fn balance(&self, base_url: &str, account: &str) -> i64 {
        self.bank(base_url)
            .account(&AccountId::new(account))
            .unwrap()
            .balance
    }
}

fn reject(err: bank_core::Error) -> LegFailure {
    let status = match err {
        bank_core::Error::AccountNotFound(_) => 404,
        _ => 400,
    };
    LegFailure::Rejected {
        status,
        detail: err.to_string(),
    }
}

#[async_trait]
impl BankClient for MockNetwork {
    async fn account_exists(
        &self,
        base_url: &str,
        account_id: &str,
    ) -> Result<bool, LegFailure> {
        Ok(self.bank(base_url).account(&AccountId::new(account_id)).is_some())
    }

    async fn debit(&self, base_url: &str, leg: &DebitLeg) -> Result<(), LegFailure> {
        self.bank(base_url)
            .debit(
                &AccountId::new(&leg.from_account),
                leg.amount,
                &leg.to_account,
                &BankId::new(&leg.to_bank),
                Some(&leg.idempotency_key),
            )
            .map(|_| ())
            .map_err(reject)
    }

    async fn credit(&self, base_url: &str, leg: &CreditLeg) -> Result<(), LegFailure> {
        let remaining = self.credit_unknowns.load(Ordering::SeqCst);
        if remaining > 0 {
            self.credit_unknowns.fetch_sub(1, Ordering::SeqCst);
            if self.apply_before_unknown {
                // The bank applied the credit, the response was lost.
                self.bank(base_url)
                    .credit(
                        &AccountId::new(&leg.account_id),
                        leg.amount,
                        &leg.from_account,
                        &BankId::new(&leg.from_bank),
                        Some(&leg.idempotency_key),
                    )
                    .map_err(reject)?;
            }
            return Err(LegFailure::Unknown("simulated timeout".to_string()));
        }

        self.bank(base_url)
            .credit(
                &AccountId::new(&leg.account_id),
                leg.amount,
                &leg.from_account,
                &BankId::new(&leg.from_bank),
                Some(&leg.idempotency_key),
            )
            .map(|_| ())
            .map_err(reject)
    }
}

fn saga_over(network: Arc<MockNetwork>) -> ClearingSaga {
    let registry = HashMap::from([
        ("bpi".to_string(), BPI_URL.to_string()),
        ("gcash".to_string(), GCASH_URL.to_string()),
    ]);
    let retry = RetryStrategy::new(RetryConfig {
        max_retries: 2,
        initial_delay_ms: 1,
        max_delay_ms: 2,
        backoff_multiplier: 2.0,
        jitter_factor: 0.0,
    });
    ClearingSaga::new(registry, network, retry)
}

fn intent(amount: i64) -> TransferIntent {
    TransferIntent {
        from_bank: "bpi".to_string(),
        to_bank: "gcash".to_string(),
        from_account: "BPI001".to_string(),
        to_account: "GCASH001".to_string(),
        amount,
    }
}

#[tokio::test]
async fn end_to_end_transfer_moves_money_intact() {
    let network = Arc::new(MockNetwork::new());
    let saga = saga_over(network.clone());

    let outcome = saga.execute(&intent(1_000)).await.unwrap();
    assert_eq!(outcome.state, TransferState::Completed);
    assert_eq!(outcome.amount, 1_000);

    assert_eq!(network.balance(BPI_URL, "BPI001"), 49_000);
    assert_eq!(network.balance(GCASH_URL, "GCASH001"), 26_000);

    // One DEBIT at bpi and one CREDIT at gcash, referencing each other
    let bpi_history = network.bank(BPI_URL).history(&AccountId::new("BPI001"));
    assert_eq!(bpi_history.len(), 1);
    assert_eq!(bpi_history[0].direction, bank_core::Direction::Debit);
    assert_eq!(bpi_history[0].counterparty_account, "GCASH001");
    assert_eq!(bpi_history[0].counterparty_bank, "gcash");

    let gcash_history = network.bank(GCASH_URL).history(&AccountId::new("GCASH001"));
    assert_eq!(gcash_history.len(), 1);
    assert_eq!(gcash_history[0].direction, bank_core::Direction::Credit);
    assert_eq!(gcash_history[0].amount, 1_000);
    assert_eq!(gcash_history[0].counterparty_account, "BPI001");
}

#[tokio::test]
async fn insufficient_funds_is_a_clean_debit_failure() {
    let network = Arc::new(MockNetwork::new());
    let saga = saga_over(network.clone());

    let err = saga.execute(&intent(50_001)).await.unwrap_err();
    assert!(matches!(err, ClearingError::DebitFailed { .. }));

    // Nothing moved on either side
    assert_eq!(network.balance(BPI_URL, "BPI001"), 50_000);
    assert_eq!(network.balance(GCASH_URL, "GCASH001"), 25_000);
}

#[tokio::test]
async fn unknown_bank_is_rejected_before_any_call() {
    let network = Arc::new(MockNetwork::new());
    let saga = saga_over(network.clone());

    let mut bad = intent(1_000);
    bad.to_bank = "metrobank".to_string();

    let err = saga.execute(&bad).await.unwrap_err();
    assert!(matches!(err, ClearingError::UnknownBank(bank) if bank == "metrobank"));
    assert_eq!(network.balance(BPI_URL, "BPI001"), 50_000);
}

#[tokio::test]
async fn missing_receiver_fails_before_the_debit() {
    let network = Arc::new(MockNetwork::new());
    let saga = saga_over(network.clone());

    let mut bad = intent(1_000);
    bad.to_account = "GHOST".to_string();

    let err = saga.execute(&bad).await.unwrap_err();
    assert!(matches!(err, ClearingError::ReceiverNotFound { .. }));

    assert_eq!(network.balance(BPI_URL, "BPI001"), 50_000);
    assert!(network.bank(BPI_URL).history(&AccountId::new("BPI001")).is_empty());
}

#[tokio::test]
async fn zero_amount_is_rejected() {
    let network = Arc::new(MockNetwork::new());
    let saga = saga_over(network);

    let err = saga.execute(&intent(0)).await.unwrap_err();
    assert!(matches!(err, ClearingError::InvalidAmount(0)));
}

#[tokio::test]
async fn credit_failure_after_debit_is_surfaced_as_inconsistent() {
    let mut network = MockNetwork::new();
    // More unknown outcomes than the strategy will retry
    network.credit_unknowns = AtomicU32::new(10);
    let network = Arc::new(network);
    let saga = saga_over(network.clone());

    let err = saga.execute(&intent(1_000)).await.unwrap_err();
    match err {
        ClearingError::InconsistentTransfer {
            from_bank,
            to_bank,
            amount,
            stage,
            ..
        } => {
            assert_eq!(from_bank, "bpi");
            assert_eq!(to_bank, "gcash");
            assert_eq!(amount, 1_000);
            assert_eq!(stage, Stage::Credit);
        }
        other => panic!("expected InconsistentTransfer, got {:?}", other),
    }

    // The debit already happened and is not silently reversed
    assert_eq!(network.balance(BPI_URL, "BPI001"), 49_000);
    assert_eq!(network.balance(GCASH_URL, "GCASH001"), 25_000);
}

#[tokio::test]
async fn credit_timeout_after_apply_is_absorbed_by_idempotent_retry() {
    let mut network = MockNetwork::new();
    // First credit call applies at the bank but the response is lost; the
    // retried call must come back as a duplicate, not a second credit.
    network.credit_unknowns = AtomicU32::new(1);
    network.apply_before_unknown = true;
    let network = Arc::new(network);
    let saga = saga_over(network.clone());

    let outcome = saga.execute(&intent(1_000)).await.unwrap();
    assert_eq!(outcome.state, TransferState::Completed);

    assert_eq!(network.balance(BPI_URL, "BPI001"), 49_000);
    assert_eq!(network.balance(GCASH_URL, "GCASH001"), 26_000);
    assert_eq!(
        network.bank(GCASH_URL).history(&AccountId::new("GCASH001")).len(),
        1
    );
}
