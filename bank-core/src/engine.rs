//! Transfer engine: the two atomic legs plus same-bank transfers and bills
//!
//! Each public operation is independently atomic within this bank. The
//! clearing house composes `debit` and `credit` across two banks; nothing in
//! this module spans more than one ledger.

use crate::billers::BillerCatalog;
use crate::error::{Error, Result};
use crate::idempotency::{IdempotencyGuard, Outcome};
use crate::ledger::AccountLedger;
use crate::txlog::TransactionLog;
use crate::types::{Account, AccountId, BankId, Direction, TransactionRecord};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Result of a bill payment, including replayed submissions
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResult {
    pub biller: String,
    pub reference_number: String,
    pub amount: i64,
    pub duplicate: bool,
    pub transaction: TransactionRecord,
}

/// Per-bank component executing single debits and credits
pub struct TransferEngine {
    bank_id: BankId,
    ledger: AccountLedger,
    log: TransactionLog,
    guard: IdempotencyGuard,
    billers: BillerCatalog,
}

impl TransferEngine {
    /// Create an engine for one bank
    pub fn new(bank_id: BankId, billers: BillerCatalog) -> Self {
        Self {
            ledger: AccountLedger::new(bank_id.clone()),
            log: TransactionLog::new(),
            guard: IdempotencyGuard::new(),
            bank_id,
            billers,
        }
    }

    /// Bank this engine belongs to
    pub fn bank_id(&self) -> &BankId {
        &self.bank_id
    }

    /// Supported billers
    pub fn billers(&self) -> &BillerCatalog {
        &self.billers
    }

    /// Provision an account (startup seeding, not a transfer path)
    pub fn provision_account(&self, account_id: AccountId, owner_name: &str, balance: i64) {
        self.ledger.insert_account(Account {
            bank_id: self.bank_id.clone(),
            account_id,
            owner_name: owner_name.to_string(),
            balance,
        });
    }

    /// Snapshot of one account
    pub fn account(&self, account_id: &AccountId) -> Option<Account> {
        self.ledger.get(account_id)
    }

    /// Recent transaction history for an account, newest first
    pub fn history(&self, account_id: &AccountId) -> Vec<TransactionRecord> {
        self.log.history(account_id)
    }

    /// Find the record previously written under an idempotency key
    pub fn find_by_idempotency_key(&self, key: &str) -> Option<TransactionRecord> {
        self.log.find_by_idempotency_key(key)
    }

    /// Debit one account: verify, adjust, append as one unit
    ///
    /// No log entry is written when the adjustment fails. With an
    /// idempotency key, a repeated call returns the original record without
    /// touching the ledger again.
    pub fn debit(
        &self,
        account_id: &AccountId,
        amount: i64,
        counterparty_account: &str,
        counterparty_bank: &BankId,
        idempotency_key: Option<&str>,
    ) -> Result<Outcome> {
        check_amount(amount)?;
        let description = if counterparty_bank == &self.bank_id {
            format!("Transfer to {}", counterparty_account)
        } else {
            format!(
                "Inter-bank transfer to {}/{}",
                counterparty_bank, counterparty_account
            )
        };

        self.guard.run(idempotency_key, || {
            self.ledger.adjust(account_id, -amount)?;
            let record = self.write_record(
                account_id,
                Direction::Debit,
                amount,
                counterparty_account,
                counterparty_bank.as_str(),
                description.clone(),
                idempotency_key,
                None,
            );
            info!(
                bank = %self.bank_id,
                account_id = %account_id,
                amount,
                counterparty = counterparty_account,
                "debit applied"
            );
            Ok(record)
        })
    }

    /// Credit one account: verify, adjust, append as one unit
    ///
    /// Credits are unconditional once the account is known to exist.
    pub fn credit(
        &self,
        account_id: &AccountId,
        amount: i64,
        counterparty_account: &str,
        counterparty_bank: &BankId,
        idempotency_key: Option<&str>,
    ) -> Result<Outcome> {
        check_amount(amount)?;
        let description = if counterparty_bank == &self.bank_id {
            format!("Transfer from {}", counterparty_account)
        } else {
            format!("Inter-bank transfer from {}", counterparty_bank)
        };

        self.guard.run(idempotency_key, || {
            self.ledger.adjust(account_id, amount)?;
            let record = self.write_record(
                account_id,
                Direction::Credit,
                amount,
                counterparty_account,
                counterparty_bank.as_str(),
                description.clone(),
                idempotency_key,
                None,
            );
            info!(
                bank = %self.bank_id,
                account_id = %account_id,
                amount,
                counterparty = counterparty_account,
                "credit applied"
            );
            Ok(record)
        })
    }

    /// Same-bank transfer: debit the sender, then credit the receiver
    ///
    /// The receiver's existence is confirmed before the debit, so once the
    /// debit lands the paired credit cannot fail (accounts are never
    /// deleted, credits are unconditional). Any validation failure leaves
    /// both balances untouched.
    pub fn transfer_local(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: i64,
    ) -> Result<(TransactionRecord, TransactionRecord)> {
        check_amount(amount)?;
        if !self.ledger.contains(from) {
            return Err(Error::AccountNotFound(from.to_string()));
        }
        if !self.ledger.contains(to) {
            return Err(Error::AccountNotFound(to.to_string()));
        }

        let debit = self
            .debit(from, amount, to.as_str(), &self.bank_id, None)?
            .record()
            .clone();
        let credit = self
            .credit(to, amount, from.as_str(), &self.bank_id, None)?
            .record()
            .clone();

        info!(
            bank = %self.bank_id,
            from = %from,
            to = %to,
            amount,
            "local transfer completed"
        );
        Ok((debit, credit))
    }

    /// Bill payment: a debit against an external biller
    ///
    /// The biller must be in this bank's catalog (case-insensitive). With an
    /// idempotency key, a replayed submission returns the original payment
    /// flagged `duplicate: true` without re-debiting.
    pub fn bill_payment(
        &self,
        account_id: &AccountId,
        biller_code: &str,
        reference_number: &str,
        amount: i64,
        idempotency_key: Option<&str>,
    ) -> Result<PaymentResult> {
        check_amount(amount)?;
        let code = biller_code.to_uppercase();
        let biller = self
            .billers
            .get(&code)
            .ok_or_else(|| Error::UnsupportedBiller(code.clone()))?;
        let biller_name = biller.name.clone();
        if !self.ledger.contains(account_id) {
            return Err(Error::AccountNotFound(account_id.to_string()));
        }

        let description = format!("Bill payment to {} (Ref: {})", biller_name, reference_number);
        let outcome = self.guard.run(idempotency_key, || {
            self.ledger.adjust(account_id, -amount)?;
            let record = self.write_record(
                account_id,
                Direction::BillPayment,
                amount,
                &code,
                "external",
                description.clone(),
                idempotency_key,
                Some(reference_number),
            );
            info!(
                bank = %self.bank_id,
                account_id = %account_id,
                biller = %code,
                amount,
                reference_number,
                "bill payment applied"
            );
            Ok(record)
        })?;

        Ok(PaymentResult {
            biller: biller_name,
            reference_number: reference_number.to_string(),
            amount,
            duplicate: outcome.is_duplicate(),
            transaction: outcome.record().clone(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn write_record(
        &self,
        account_id: &AccountId,
        direction: Direction,
        amount: i64,
        counterparty_account: &str,
        counterparty_bank: &str,
        description: String,
        idempotency_key: Option<&str>,
        reference_number: Option<&str>,
    ) -> TransactionRecord {
        let record = TransactionRecord {
            id: Uuid::new_v4(),
            bank_id: self.bank_id.clone(),
            account_id: account_id.clone(),
            direction,
            amount,
            counterparty_account: counterparty_account.to_string(),
            counterparty_bank: counterparty_bank.to_string(),
            description,
            // Fresh timestamp at the moment of the write, never cached
            timestamp: Utc::now(),
            idempotency_key: idempotency_key.map(str::to_string),
            reference_number: reference_number.map(str::to_string),
        };
        self.log.append(record.clone());
        record
    }
}

fn check_amount(amount: i64) -> Result<()> {
    if amount <= 0 {
        return Err(Error::InvalidAmount(amount));
    }
    Ok(())
}
