//! Dashboard report composition
//!
//! Orchestrates timeframe resolution, the ledger rollups, percentage deltas,
//! and the net-worth projection into one composite report.
//!
//! Failure policy: resilient zero-fill. Every section runs against its own
//! independent, idempotent store queries; a section whose queries fail (or
//! exceed the per-report time budget) is logged via `tracing::warn!` and
//! lands in the report as zeros/empty, and the report as a whole is always
//! produced. Consumers never see NaN or missing numeric fields.

use std::time::{Duration, Instant};

use chrono::{DateTime, Months, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::aggregate::{self, truncate_to_bucket};
use crate::delta::percent_change;
use crate::error::Result;
use crate::models::{
    Account, AccountKind, AccountOverview, CategoryBreakdown, DashboardReport, DashboardSummary,
    Granularity, ReportPeriod, TrendPoint,
};
use crate::networth;
use crate::store::{AmountSign, LedgerStore};
use crate::timeframe::{DateRange, Timeframe};

/// Fixed palette assigned to category slices by rank
pub const CATEGORY_PALETTE: [&str; 6] = [
    "#6366f1", "#8b5cf6", "#ec4899", "#f59e0b", "#10b981", "#3b82f6",
];

/// Category breakdown shows the top slices by spend
pub const TOP_CATEGORIES: usize = 6;

/// Recent-transaction list length
pub const RECENT_LIMIT: usize = 10;

/// Months covered by the income/expense trend chart
pub const TREND_MONTHS: usize = 6;

/// Round to 2 decimal places; applied only at the report boundary
fn round2(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Composes the dashboard report from a ledger store.
///
/// Carries the retry count and time budget applied to every store query.
#[derive(Debug, Clone)]
pub struct DashboardComposer {
    retries: u32,
    budget: Duration,
}

impl Default for DashboardComposer {
    fn default() -> Self {
        Self {
            retries: 1,
            budget: Duration::from_secs(10),
        }
    }
}

impl DashboardComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times a failed store query is retried (queries are
    /// read-only, so retrying is always safe)
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Wall-clock budget for the whole report; queries issued after expiry
    /// are treated as failed and their sections zero-filled
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Compose a report with the ambient clock and an entropy-seeded RNG
    pub fn compose_now<S>(&self, store: &S, user_id: i64, token: Option<&str>) -> DashboardReport
    where
        S: LedgerStore + ?Sized,
    {
        let mut rng = StdRng::from_entropy();
        self.compose(store, user_id, Timeframe::parse(token), Utc::now(), &mut rng)
    }

    /// Compose a report for an explicit instant and random source.
    ///
    /// Never fails: sections whose queries error are zero-filled (see module
    /// docs), and degenerate inputs (no accounts, no transactions) produce a
    /// valid zero/baseline report.
    pub fn compose<S, R>(
        &self,
        store: &S,
        user_id: i64,
        timeframe: Timeframe,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> DashboardReport
    where
        S: LedgerStore + ?Sized,
        R: Rng,
    {
        let resolved = timeframe.resolve(now);
        let current = resolved.current;
        let comparison = resolved.comparison;
        let deadline = Instant::now() + self.budget;

        let accounts = self
            .fetch("accounts", deadline, || store.active_accounts(user_id))
            .unwrap_or_default();
        let account_ids: Vec<i64> = accounts.iter().map(|a| a.id).collect();

        let summary = self.compose_summary(store, &account_ids, &accounts, current, comparison, deadline);

        let account_overviews: Vec<AccountOverview> = accounts
            .iter()
            .map(|account| {
                let activity = self
                    .fetch("account_activity", deadline, || {
                        store.sum_transactions(&[account.id], current, None)
                    })
                    .unwrap_or(0.0);
                let previous = self
                    .fetch("account_activity", deadline, || {
                        store.sum_transactions(&[account.id], comparison, None)
                    })
                    .unwrap_or(0.0);
                AccountOverview {
                    id: account.id,
                    name: account.name.clone(),
                    kind: account.kind,
                    balance: round2(account.balance),
                    activity: round2(activity),
                    activity_change: round2(percent_change(activity, previous)),
                }
            })
            .collect();

        let categories = self.compose_categories(store, user_id, current, deadline);
        let monthly_trend = self.compose_trend(store, user_id, now, deadline);

        let recent_transactions = self
            .fetch("recent_transactions", deadline, || {
                store.recent_transactions(user_id, RECENT_LIMIT)
            })
            .unwrap_or_default();

        let net_worth_series = networth::project(&accounts, timeframe, now, rng)
            .into_iter()
            .map(|mut point| {
                point.net_worth = round2(point.net_worth);
                point.assets = round2(point.assets);
                point.liabilities = round2(point.liabilities);
                point
            })
            .collect();

        DashboardReport {
            timeframe: timeframe.as_str().to_string(),
            period: ReportPeriod {
                from: current.start.to_string(),
                to: current.last_day().to_string(),
            },
            summary,
            accounts: account_overviews,
            recent_transactions,
            categories,
            monthly_trend,
            net_worth_series,
        }
    }

    fn compose_summary<S>(
        &self,
        store: &S,
        account_ids: &[i64],
        accounts: &[Account],
        current: DateRange,
        comparison: DateRange,
        deadline: Instant,
    ) -> DashboardSummary
    where
        S: LedgerStore + ?Sized,
    {
        let sum = |range: DateRange, sign: Option<AmountSign>| {
            self.fetch("summary", deadline, || {
                store.sum_transactions(account_ids, range, sign)
            })
            .unwrap_or(0.0)
        };

        let income = sum(current, Some(AmountSign::Inflow));
        let expenses = sum(current, Some(AmountSign::Outflow)).abs();
        let prev_income = sum(comparison, Some(AmountSign::Inflow));
        let prev_expenses = sum(comparison, Some(AmountSign::Outflow)).abs();

        let investment_ids: Vec<i64> = accounts
            .iter()
            .filter(|a| a.kind == AccountKind::Investment)
            .map(|a| a.id)
            .collect();
        let invest = |range: DateRange| {
            self.fetch("summary", deadline, || {
                store.sum_transactions(&investment_ids, range, None)
            })
            .unwrap_or(0.0)
        };
        let investment = invest(current);
        let prev_investment = invest(comparison);

        DashboardSummary {
            income: round2(income),
            expenses: round2(expenses),
            net: round2(income - expenses),
            income_change: round2(percent_change(income, prev_income)),
            expense_change: round2(percent_change(expenses, prev_expenses)),
            investment_change: round2(percent_change(investment, prev_investment)),
        }
    }

    fn compose_categories<S>(
        &self,
        store: &S,
        user_id: i64,
        current: DateRange,
        deadline: Instant,
    ) -> Vec<CategoryBreakdown>
    where
        S: LedgerStore + ?Sized,
    {
        let transactions = self
            .fetch("categories", deadline, || {
                store.transactions_in_range(user_id, current)
            })
            .unwrap_or_default();

        let rollup = aggregate::category_rollup(&transactions);
        let total: f64 = rollup.iter().map(|r| r.total).sum();

        rollup
            .into_iter()
            .take(TOP_CATEGORIES)
            .enumerate()
            .map(|(rank, row)| CategoryBreakdown {
                category: row.category,
                amount: round2(row.total),
                percentage: if total > 0.0 {
                    round2(row.total / total * 100.0)
                } else {
                    0.0
                },
                transaction_count: row.transaction_count,
                color: CATEGORY_PALETTE[rank % CATEGORY_PALETTE.len()].to_string(),
            })
            .collect()
    }

    /// Income/expense totals for the last [`TREND_MONTHS`] calendar months,
    /// zero-filling months with no activity
    fn compose_trend<S>(
        &self,
        store: &S,
        user_id: i64,
        now: DateTime<Utc>,
        deadline: Instant,
    ) -> Vec<TrendPoint>
    where
        S: LedgerStore + ?Sized,
    {
        let today = now.date_naive();
        let this_month = truncate_to_bucket(today, Granularity::Monthly);
        let Some(start) = this_month.checked_sub_months(Months::new(TREND_MONTHS as u32 - 1))
        else {
            return vec![];
        };
        let range = DateRange {
            start,
            end: today + chrono::Duration::days(1),
        };

        let transactions = self
            .fetch("monthly_trend", deadline, || {
                store.transactions_in_range(user_id, range)
            })
            .unwrap_or_default();
        let buckets = aggregate::calendar_rollup(&transactions, Granularity::Monthly);

        (0..TREND_MONTHS)
            .filter_map(|i| this_month.checked_sub_months(Months::new((TREND_MONTHS - 1 - i) as u32)))
            .map(|month| {
                let bucket = buckets.iter().find(|b| b.bucket == month);
                TrendPoint {
                    month: month.format("%b").to_string(),
                    income: round2(bucket.map_or(0.0, |b| b.income)),
                    expenses: round2(bucket.map_or(0.0, |b| b.expenses)),
                }
            })
            .collect()
    }

    /// Run one store query under the report deadline, retrying on failure.
    /// Returns `None` when the section should be zero-filled.
    fn fetch<T>(
        &self,
        section: &'static str,
        deadline: Instant,
        query: impl Fn() -> Result<T>,
    ) -> Option<T> {
        for attempt in 0..=self.retries {
            if Instant::now() >= deadline {
                warn!(section, "Report budget exhausted; zero-filling section");
                return None;
            }
            match query() {
                Ok(value) => return Some(value),
                Err(e) if attempt < self.retries => {
                    warn!(section, attempt, error = %e, "Ledger query failed; retrying");
                }
                Err(e) => {
                    warn!(section, error = %e, "Ledger query failed; zero-filling section");
                    return None;
                }
            }
        }
        None
    }
}
