//! Account ledger: per-bank balance store with atomic conditional adjustment
//!
//! The only mutation path is [`AccountLedger::adjust`], which performs the
//! read-check-write for one account as a single step. Concurrent callers on
//! the same account serialize on the account's map entry; callers on
//! different accounts proceed in parallel.

use crate::error::{Error, Result};
use crate::types::{Account, AccountId, BankId};
use dashmap::DashMap;
use tracing::debug;

/// Per-bank key-value store of account balances
pub struct AccountLedger {
    bank_id: BankId,
    accounts: DashMap<AccountId, Account>,
}

impl AccountLedger {
    /// Create an empty ledger for one bank
    pub fn new(bank_id: BankId) -> Self {
        Self {
            bank_id,
            accounts: DashMap::new(),
        }
    }

    /// Owning bank
    pub fn bank_id(&self) -> &BankId {
        &self.bank_id
    }

    /// Provision an account (out-of-band setup, not a transfer path)
    ///
    /// Replaces any existing account with the same ID.
    pub fn insert_account(&self, account: Account) {
        debug!(
            account_id = %account.account_id,
            balance = account.balance,
            "provisioning account"
        );
        self.accounts.insert(account.account_id.clone(), account);
    }

    /// Snapshot of one account
    pub fn get(&self, account_id: &AccountId) -> Option<Account> {
        self.accounts.get(account_id).map(|a| a.clone())
    }

    /// Whether the account exists
    pub fn contains(&self, account_id: &AccountId) -> bool {
        self.accounts.contains_key(account_id)
    }

    /// Atomically adjust a balance by `delta`, returning the new balance
    ///
    /// A negative delta requires `balance + delta >= 0`, otherwise the call
    /// fails with `InsufficientFunds` and the balance is untouched. Positive
    /// deltas are unconditional up to `i64::MAX`; a credit that would
    /// overflow fails with `BalanceOverflow`. The check and the write happen
    /// under the account's entry lock, so no interleaving can drive a
    /// balance negative.
    pub fn adjust(&self, account_id: &AccountId, delta: i64) -> Result<i64> {
        let mut entry = self
            .accounts
            .get_mut(account_id)
            .ok_or_else(|| Error::AccountNotFound(account_id.to_string()))?;

        let new_balance = entry
            .balance
            .checked_add(delta)
            .ok_or_else(|| Error::BalanceOverflow(account_id.to_string()))?;
        if new_balance < 0 {
            return Err(Error::InsufficientFunds {
                required: -delta,
                available: entry.balance,
            });
        }

        entry.balance = new_balance;
        debug!(
            account_id = %account_id,
            delta,
            balance = entry.balance,
            "balance adjusted"
        );
        Ok(entry.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ledger() -> AccountLedger {
        let ledger = AccountLedger::new(BankId::new("bpi"));
        ledger.insert_account(Account {
            bank_id: BankId::new("bpi"),
            account_id: AccountId::new("BPI001"),
            owner_name: "Alice".to_string(),
            balance: 1000,
        });
        ledger
    }

    #[test]
    fn test_credit_unconditional() {
        let ledger = test_ledger();
        let balance = ledger.adjust(&AccountId::new("BPI001"), 500).unwrap();
        assert_eq!(balance, 1500);
    }

    #[test]
    fn test_debit_within_balance() {
        let ledger = test_ledger();
        let balance = ledger.adjust(&AccountId::new("BPI001"), -1000).unwrap();
        assert_eq!(balance, 0);
    }

    #[test]
    fn test_debit_overdraft_rejected() {
        let ledger = test_ledger();
        let err = ledger.adjust(&AccountId::new("BPI001"), -1001).unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientFunds {
                required: 1001,
                available: 1000
            }
        );
        // Balance unchanged after the failed adjustment
        assert_eq!(ledger.get(&AccountId::new("BPI001")).unwrap().balance, 1000);
    }

    #[test]
    fn test_credit_overflow_rejected() {
        let ledger = test_ledger();
        let err = ledger
            .adjust(&AccountId::new("BPI001"), i64::MAX)
            .unwrap_err();
        assert_eq!(err, Error::BalanceOverflow("BPI001".to_string()));
        // Balance unchanged after the rejected credit
        assert_eq!(ledger.get(&AccountId::new("BPI001")).unwrap().balance, 1000);
    }

    #[test]
    fn test_unknown_account() {
        let ledger = test_ledger();
        let err = ledger.adjust(&AccountId::new("NOPE"), 100).unwrap_err();
        assert_eq!(err, Error::AccountNotFound("NOPE".to_string()));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let ledger = test_ledger();
        assert!(ledger.get(&AccountId::new("bpi001")).is_some());
    }
}
