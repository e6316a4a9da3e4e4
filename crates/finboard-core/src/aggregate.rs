//! Grouped rollups over ledger transactions
//!
//! All functions here are pure: they take a slice of transactions already
//! restricted to a date range and active accounts, and produce tagged rollup
//! rows. Internal math stays in f64; rounding to 2 decimals is the report
//! boundary's job, not ours.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{
    BucketRollup, CategoryRollup, Granularity, IncomeExpenseSplit, MerchantRollup, Transaction,
};

/// Sentinel label for transactions without a category
pub const UNCATEGORIZED: &str = "Other";

/// Sum of inflows, sum of outflow magnitudes, and total count.
///
/// Zero transactions yield zeros, never null.
pub fn income_expense_split(transactions: &[Transaction]) -> IncomeExpenseSplit {
    let mut split = IncomeExpenseSplit::default();
    for tx in transactions {
        if tx.amount > 0.0 {
            split.income += tx.amount;
        } else {
            split.expenses += tx.amount.abs();
        }
        split.transaction_count += 1;
    }
    split
}

/// Expense spending grouped by category label.
///
/// Only outflows count; absent categories fall into [`UNCATEGORIZED`] rather
/// than being dropped. Rows are ordered by descending total, then ascending
/// label for determinism.
pub fn category_rollup(transactions: &[Transaction]) -> Vec<CategoryRollup> {
    let mut groups: HashMap<String, (f64, i64)> = HashMap::new();
    for tx in transactions.iter().filter(|t| t.amount < 0.0) {
        let label = tx
            .category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(UNCATEGORIZED);
        let entry = groups.entry(label.to_string()).or_default();
        entry.0 += tx.amount.abs();
        entry.1 += 1;
    }

    let mut rows: Vec<CategoryRollup> = groups
        .into_iter()
        .map(|(category, (total, count))| CategoryRollup {
            category,
            total,
            transaction_count: count,
            average: if count > 0 { total / count as f64 } else { 0.0 },
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

/// Expense spending grouped by merchant label.
///
/// Restricted to rows that carry a merchant; same ordering rule as
/// [`category_rollup`].
pub fn merchant_rollup(transactions: &[Transaction]) -> Vec<MerchantRollup> {
    let mut groups: HashMap<String, (f64, i64)> = HashMap::new();
    for tx in transactions.iter().filter(|t| t.amount < 0.0) {
        let Some(merchant) = tx.merchant.as_deref().filter(|m| !m.trim().is_empty()) else {
            continue;
        };
        let entry = groups.entry(merchant.to_string()).or_default();
        entry.0 += tx.amount.abs();
        entry.1 += 1;
    }

    let mut rows: Vec<MerchantRollup> = groups
        .into_iter()
        .map(|(merchant, (total, count))| MerchantRollup {
            merchant,
            total,
            transaction_count: count,
            average: if count > 0 { total / count as f64 } else { 0.0 },
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.merchant.cmp(&b.merchant))
    });
    rows
}

/// Truncate a date to the start of its calendar bucket
pub fn truncate_to_bucket(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Daily => date,
        Granularity::Monthly => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .unwrap_or(date),
        Granularity::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
    }
}

/// Income and expense totals grouped by calendar bucket, ascending by bucket
pub fn calendar_rollup(transactions: &[Transaction], granularity: Granularity) -> Vec<BucketRollup> {
    let mut groups: HashMap<NaiveDate, (f64, f64, i64)> = HashMap::new();
    for tx in transactions {
        let bucket = truncate_to_bucket(tx.date, granularity);
        let entry = groups.entry(bucket).or_default();
        if tx.amount > 0.0 {
            entry.0 += tx.amount;
        } else {
            entry.1 += tx.amount.abs();
        }
        entry.2 += 1;
    }

    let mut rows: Vec<BucketRollup> = groups
        .into_iter()
        .map(|(bucket, (income, expenses, count))| BucketRollup {
            bucket,
            income,
            expenses,
            transaction_count: count,
        })
        .collect();
    rows.sort_by_key(|r| r.bucket);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tx(amount: f64, date: (i32, u32, u32), category: Option<&str>, merchant: Option<&str>) -> Transaction {
        Transaction {
            id: 0,
            account_id: 1,
            amount,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            category: category.map(String::from),
            merchant: merchant.map(String::from),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_income_expense_split() {
        let txs = vec![
            tx(2500.0, (2026, 8, 1), Some("Salary"), None),
            tx(-120.0, (2026, 8, 3), Some("Food"), Some("Grocer")),
            tx(-80.0, (2026, 8, 5), Some("Transport"), None),
        ];
        let split = income_expense_split(&txs);
        assert_eq!(split.income, 2500.0);
        assert_eq!(split.expenses, 200.0);
        assert_eq!(split.transaction_count, 3);
    }

    #[test]
    fn test_split_of_nothing_is_zero() {
        let split = income_expense_split(&[]);
        assert_eq!(split.income, 0.0);
        assert_eq!(split.expenses, 0.0);
        assert_eq!(split.transaction_count, 0);
    }

    #[test]
    fn test_category_rollup_normalizes_missing_labels() {
        let txs = vec![
            tx(-20.0, (2026, 8, 1), Some("Food"), None),
            tx(-30.0, (2026, 8, 2), Some("Food"), None),
            tx(-10.0, (2026, 8, 3), None, None),
        ];
        let rows = category_rollup(&txs);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "Food");
        assert_eq!(rows[0].total, 50.0);
        assert_eq!(rows[0].transaction_count, 2);
        assert_eq!(rows[0].average, 25.0);
        assert_eq!(rows[1].category, "Other");
        assert_eq!(rows[1].total, 10.0);
    }

    #[test]
    fn test_category_rollup_ignores_income() {
        let txs = vec![
            tx(500.0, (2026, 8, 1), Some("Salary"), None),
            tx(-10.0, (2026, 8, 2), Some("Food"), None),
        ];
        let rows = category_rollup(&txs);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Food");
    }

    #[test]
    fn test_category_rollup_breaks_ties_by_label() {
        let txs = vec![
            tx(-25.0, (2026, 8, 1), Some("Zoo"), None),
            tx(-25.0, (2026, 8, 2), Some("Art"), None),
        ];
        let rows = category_rollup(&txs);
        assert_eq!(rows[0].category, "Art");
        assert_eq!(rows[1].category, "Zoo");
    }

    #[test]
    fn test_merchant_rollup_skips_missing_merchants() {
        let txs = vec![
            tx(-15.0, (2026, 8, 1), Some("Food"), Some("Cafe")),
            tx(-45.0, (2026, 8, 2), Some("Food"), Some("Grocer")),
            tx(-99.0, (2026, 8, 3), Some("Food"), None),
            tx(-5.0, (2026, 8, 4), Some("Food"), Some("  ")),
        ];
        let rows = merchant_rollup(&txs);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].merchant, "Grocer");
        assert_eq!(rows[1].merchant, "Cafe");
    }

    #[test]
    fn test_calendar_rollup_monthly_buckets_ascend() {
        let txs = vec![
            tx(-10.0, (2026, 8, 20), None, None),
            tx(-20.0, (2026, 6, 5), None, None),
            tx(300.0, (2026, 8, 2), None, None),
            tx(-5.0, (2026, 6, 30), None, None),
        ];
        let rows = calendar_rollup(&txs, Granularity::Monthly);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bucket, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        assert_eq!(rows[0].expenses, 25.0);
        assert_eq!(rows[1].bucket, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        assert_eq!(rows[1].income, 300.0);
        assert_eq!(rows[1].expenses, 10.0);
    }

    #[test]
    fn test_calendar_rollup_daily_keeps_dates() {
        let txs = vec![
            tx(-10.0, (2026, 8, 20), None, None),
            tx(-20.0, (2026, 8, 20), None, None),
            tx(-1.0, (2026, 8, 21), None, None),
        ];
        let rows = calendar_rollup(&txs, Granularity::Daily);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].transaction_count, 2);
        assert_eq!(rows[0].expenses, 30.0);
    }
}
