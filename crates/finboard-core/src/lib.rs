//! finboard Core Library
//!
//! Ledger analytics for the finboard dashboard:
//! - Timeframe resolution with an explicit, testable "now"
//! - SQLite-backed ledger store behind a query trait
//! - Grouped rollups (income/expense, category, merchant, calendar bucket)
//! - Safe percentage-change computation
//! - Net-worth time-series projection with synthetic history
//! - Composite dashboard report assembly

pub mod aggregate;
pub mod dashboard;
pub mod delta;
pub mod error;
pub mod models;
pub mod networth;
pub mod store;
pub mod timeframe;

/// Test utilities (in-memory and fault-injecting ledger stores)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use dashboard::DashboardComposer;
pub use delta::percent_change;
pub use error::{Error, Result};
pub use models::{
    Account, AccountKind, BucketRollup, CategoryRollup, DashboardReport, Granularity,
    IncomeExpenseSplit, MerchantRollup, NetWorthPoint, NewTransaction, Transaction,
};
pub use store::{AmountSign, Database, LedgerStore};
pub use timeframe::{DateRange, ResolvedTimeframe, Timeframe};
