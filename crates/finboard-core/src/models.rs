//! Domain models for finboard

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A financial account in the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    /// The user who owns this account
    pub user_id: i64,
    pub name: String,
    pub kind: AccountKind,
    /// Signed current balance. For `credit` accounts the magnitude is the
    /// outstanding debt.
    pub balance: f64,
    /// Soft-delete flag; inactive accounts never contribute to aggregates
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Investment,
    Credit,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Investment => "investment",
            Self::Credit => "credit",
        }
    }

    /// Credit balances are interpreted as magnitude of debt
    pub fn is_liability(&self) -> bool {
        matches!(self, Self::Credit)
    }
}

impl std::str::FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "investment" => Ok(Self::Investment),
            "credit" => Ok(Self::Credit),
            _ => Err(format!("Unknown account kind: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger transaction. Positive amounts are inflows, negative are outflows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: Option<String>,
    pub merchant: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A transaction being recorded (manual entry or upstream sync)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: f64,
    pub date: NaiveDate,
    pub category: Option<String>,
    pub merchant: Option<String>,
}

/// Granularity for calendar-bucket rollups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Monthly,
    Yearly,
}

/// Income/expense totals for a period.
///
/// Expenses are reported as positive magnitude.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeExpenseSplit {
    pub income: f64,
    pub expenses: f64,
    pub transaction_count: i64,
}

/// Spending grouped by category label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRollup {
    pub category: String,
    pub total: f64,
    pub transaction_count: i64,
    pub average: f64,
}

/// Spending grouped by merchant label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantRollup {
    pub merchant: String,
    pub total: f64,
    pub transaction_count: i64,
    pub average: f64,
}

/// Activity grouped by calendar bucket (truncated date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketRollup {
    /// Truncated to the first day of the bucket
    pub bucket: NaiveDate,
    pub income: f64,
    pub expenses: f64,
    pub transaction_count: i64,
}

/// One sample of the net-worth time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetWorthPoint {
    pub label: String,
    pub net_worth: f64,
    pub assets: f64,
    pub liabilities: f64,
}

/// Reporting period covered by a dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub from: String,
    pub to: String,
}

/// Headline figures for the dashboard, with period-over-period deltas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub income: f64,
    pub expenses: f64,
    /// Income minus expenses for the period
    pub net: f64,
    pub income_change: f64,
    pub expense_change: f64,
    /// Percent change of investment-account activity vs the comparison period
    pub investment_change: f64,
}

/// One account as shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountOverview {
    pub id: i64,
    pub name: String,
    pub kind: AccountKind,
    pub balance: f64,
    /// Net transaction flow through this account in the current period
    pub activity: f64,
    /// Percent change of activity vs the comparison period
    pub activity_change: f64,
}

/// One slice of the category breakdown chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
    pub transaction_count: i64,
    /// Chart color assigned by rank from a fixed palette
    pub color: String,
}

/// One month of the income/expense trend chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: String,
    pub income: f64,
    pub expenses: f64,
}

/// The composite dashboard report.
///
/// This is a plain structured record; the presentation layer serializes it
/// without further computation. Numeric fields are always present and are
/// rounded to 2 decimal places.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub timeframe: String,
    pub period: ReportPeriod,
    pub summary: DashboardSummary,
    pub accounts: Vec<AccountOverview>,
    pub recent_transactions: Vec<Transaction>,
    pub categories: Vec<CategoryBreakdown>,
    pub monthly_trend: Vec<TrendPoint>,
    pub net_worth_series: Vec<NetWorthPoint>,
}
