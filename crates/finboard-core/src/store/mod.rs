//! Ledger store query surface
//!
//! The analytics core never owns persistence: it computes over whatever
//! ledger snapshot the store hands it at call time. [`LedgerStore`] is that
//! seam. Every query is read-only and idempotent, so callers may retry it
//! safely on transient failure; on no-match a query returns an empty
//! collection or `0`, never null.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Account, Transaction};
use crate::timeframe::DateRange;

mod sqlite;

pub use sqlite::{Database, DbConn, DbPool};

/// Sign filter for transaction sums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountSign {
    /// Positive amounts (income)
    Inflow,
    /// Negative amounts (expenses)
    Outflow,
}

/// Read-only query surface over the transaction ledger.
///
/// Implementations must scope every result to **active** accounts owned by
/// the requesting user; returning another user's rows is a correctness
/// violation, not a recoverable error.
pub trait LedgerStore {
    /// All active accounts owned by the user
    fn active_accounts(&self, user_id: i64) -> Result<Vec<Account>>;

    /// Transactions in `[range.start, range.end)` across all of the user's
    /// active accounts
    fn transactions_in_range(&self, user_id: i64, range: DateRange) -> Result<Vec<Transaction>>;

    /// Transactions in the range for an explicit set of accounts
    fn account_transactions_in_range(
        &self,
        account_ids: &[i64],
        range: DateRange,
    ) -> Result<Vec<Transaction>>;

    /// Signed sum of transaction amounts for the accounts and range,
    /// optionally restricted to one sign. `0.0` when nothing matches.
    fn sum_transactions(
        &self,
        account_ids: &[i64],
        range: DateRange,
        sign: Option<AmountSign>,
    ) -> Result<f64>;

    /// Most recent transactions for the user's active accounts, newest first
    fn recent_transactions(&self, user_id: i64, limit: usize) -> Result<Vec<Transaction>>;
}
