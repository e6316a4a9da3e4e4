//! Test utilities: in-memory and fault-injecting ledger stores
//!
//! `MemoryLedger` is a plain vector-backed [`LedgerStore`] for unit tests
//! that do not need SQLite. `FlakyLedger` wraps it and fails chosen
//! operations a set number of times, for exercising retry and zero-fill
//! behavior in the dashboard composer.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::models::{Account, AccountKind, Transaction};
use crate::store::{AmountSign, LedgerStore};
use crate::timeframe::DateRange;

/// Vector-backed ledger store for tests
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_account(&mut self, user_id: i64, kind: AccountKind, balance: f64) -> i64 {
        let id = self.accounts.len() as i64 + 1;
        self.accounts.push(Account {
            id,
            user_id,
            name: format!("account-{}", id),
            kind,
            balance,
            active: true,
            created_at: Utc::now(),
        });
        id
    }

    pub fn deactivate(&mut self, account_id: i64) {
        if let Some(account) = self.accounts.iter_mut().find(|a| a.id == account_id) {
            account.active = false;
        }
    }

    pub fn add_transaction(
        &mut self,
        account_id: i64,
        amount: f64,
        date: NaiveDate,
        category: Option<&str>,
        merchant: Option<&str>,
    ) -> i64 {
        let id = self.transactions.len() as i64 + 1;
        self.transactions.push(Transaction {
            id,
            account_id,
            amount,
            date,
            category: category.map(String::from),
            merchant: merchant.map(String::from),
            created_at: Utc::now(),
        });
        id
    }

    fn active_ids(&self, user_id: i64) -> Vec<i64> {
        self.accounts
            .iter()
            .filter(|a| a.user_id == user_id && a.active)
            .map(|a| a.id)
            .collect()
    }
}

impl LedgerStore for MemoryLedger {
    fn active_accounts(&self, user_id: i64) -> Result<Vec<Account>> {
        Ok(self
            .accounts
            .iter()
            .filter(|a| a.user_id == user_id && a.active)
            .cloned()
            .collect())
    }

    fn transactions_in_range(&self, user_id: i64, range: DateRange) -> Result<Vec<Transaction>> {
        let ids = self.active_ids(user_id);
        self.account_transactions_in_range(&ids, range)
    }

    fn account_transactions_in_range(
        &self,
        account_ids: &[i64],
        range: DateRange,
    ) -> Result<Vec<Transaction>> {
        let mut txs: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| account_ids.contains(&t.account_id) && range.contains(t.date))
            .cloned()
            .collect();
        txs.sort_by_key(|t| (t.date, t.id));
        Ok(txs)
    }

    fn sum_transactions(
        &self,
        account_ids: &[i64],
        range: DateRange,
        sign: Option<AmountSign>,
    ) -> Result<f64> {
        Ok(self
            .transactions
            .iter()
            .filter(|t| account_ids.contains(&t.account_id) && range.contains(t.date))
            .filter(|t| match sign {
                Some(AmountSign::Inflow) => t.amount > 0.0,
                Some(AmountSign::Outflow) => t.amount < 0.0,
                None => true,
            })
            .map(|t| t.amount)
            .sum())
    }

    fn recent_transactions(&self, user_id: i64, limit: usize) -> Result<Vec<Transaction>> {
        let ids = self.active_ids(user_id);
        let mut txs: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| ids.contains(&t.account_id))
            .cloned()
            .collect();
        txs.sort_by_key(|t| std::cmp::Reverse((t.date, t.id)));
        txs.truncate(limit);
        Ok(txs)
    }
}

/// Ledger store operations, for fault injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerOp {
    ActiveAccounts,
    TransactionsInRange,
    AccountTransactions,
    Sum,
    Recent,
}

/// Wraps a [`MemoryLedger`] and fails selected operations a configured
/// number of times before letting them through.
#[derive(Debug, Default)]
pub struct FlakyLedger {
    pub inner: MemoryLedger,
    failures: RefCell<HashMap<LedgerOp, u32>>,
    calls: RefCell<HashMap<LedgerOp, u32>>,
}

impl FlakyLedger {
    pub fn new(inner: MemoryLedger) -> Self {
        Self {
            inner,
            failures: RefCell::new(HashMap::new()),
            calls: RefCell::new(HashMap::new()),
        }
    }

    /// Fail the next `times` invocations of `op` (use `u32::MAX` for always)
    pub fn fail(&self, op: LedgerOp, times: u32) {
        self.failures.borrow_mut().insert(op, times);
    }

    /// Number of times `op` has been invoked, failures included
    pub fn calls(&self, op: LedgerOp) -> u32 {
        self.calls.borrow().get(&op).copied().unwrap_or(0)
    }

    fn trip(&self, op: LedgerOp) -> Result<()> {
        *self.calls.borrow_mut().entry(op).or_insert(0) += 1;
        let mut failures = self.failures.borrow_mut();
        match failures.get_mut(&op) {
            Some(0) | None => Ok(()),
            Some(remaining) => {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                Err(Error::Store(format!("injected failure for {:?}", op)))
            }
        }
    }
}

impl LedgerStore for FlakyLedger {
    fn active_accounts(&self, user_id: i64) -> Result<Vec<Account>> {
        self.trip(LedgerOp::ActiveAccounts)?;
        self.inner.active_accounts(user_id)
    }

    fn transactions_in_range(&self, user_id: i64, range: DateRange) -> Result<Vec<Transaction>> {
        self.trip(LedgerOp::TransactionsInRange)?;
        self.inner.transactions_in_range(user_id, range)
    }

    fn account_transactions_in_range(
        &self,
        account_ids: &[i64],
        range: DateRange,
    ) -> Result<Vec<Transaction>> {
        self.trip(LedgerOp::AccountTransactions)?;
        self.inner.account_transactions_in_range(account_ids, range)
    }

    fn sum_transactions(
        &self,
        account_ids: &[i64],
        range: DateRange,
        sign: Option<AmountSign>,
    ) -> Result<f64> {
        self.trip(LedgerOp::Sum)?;
        self.inner.sum_transactions(account_ids, range, sign)
    }

    fn recent_transactions(&self, user_id: i64, limit: usize) -> Result<Vec<Transaction>> {
        self.trip(LedgerOp::Recent)?;
        self.inner.recent_transactions(user_id, limit)
    }
}
