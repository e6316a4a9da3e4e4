//! Integration tests for finboard-core
//!
//! These tests exercise the full seed → query → compose workflow against the
//! SQLite ledger store.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use finboard_core::{
    aggregate, dashboard::DashboardComposer, networth, store::Database, AccountKind, AmountSign,
    DateRange, LedgerStore, NewTransaction, Timeframe,
};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 27, 9, 30, 0).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tx(amount: f64, date: NaiveDate, category: Option<&str>, merchant: Option<&str>) -> NewTransaction {
    NewTransaction {
        amount,
        date,
        category: category.map(String::from),
        merchant: merchant.map(String::from),
    }
}

/// A user with a checking account, a credit card, and six months of activity
fn seed_user(db: &Database, user_id: i64) -> (i64, i64) {
    let checking = db
        .create_account(user_id, "Everyday Checking", AccountKind::Checking, 10_000.0)
        .unwrap();
    let card = db
        .create_account(user_id, "Rewards Card", AccountKind::Credit, -2_000.0)
        .unwrap();

    for month in 3..=8 {
        db.insert_transaction(checking, &tx(2_500.0, day(2026, month, 1), Some("Salary"), None))
            .unwrap();
        db.insert_transaction(
            card,
            &tx(-600.0, day(2026, month, 5), Some("Rent"), Some("Property Co")),
        )
        .unwrap();
        db.insert_transaction(
            card,
            &tx(-150.0, day(2026, month, 12), Some("Food"), Some("Grocer")),
        )
        .unwrap();
    }
    db.insert_transaction(card, &tx(-75.0, day(2026, 8, 20), None, None))
        .unwrap();

    (checking, card)
}

// =============================================================================
// Store + aggregation workflow
// =============================================================================

#[test]
fn test_rollups_over_store_snapshot() {
    let db = Database::in_memory().unwrap();
    seed_user(&db, 1);

    let resolved = Timeframe::Month.resolve(fixed_now());
    let snapshot = db.transactions_in_range(1, resolved.current).unwrap();
    assert_eq!(snapshot.len(), 4);

    let split = aggregate::income_expense_split(&snapshot);
    assert_eq!(split.income, 2_500.0);
    assert_eq!(split.expenses, 825.0);

    let categories = aggregate::category_rollup(&snapshot);
    assert_eq!(categories[0].category, "Rent");
    assert_eq!(categories[0].total, 600.0);
    assert!(categories.iter().any(|c| c.category == "Other"));

    let merchants = aggregate::merchant_rollup(&snapshot);
    assert_eq!(merchants.len(), 2);
    assert_eq!(merchants[0].merchant, "Property Co");
}

#[test]
fn test_sums_match_fetched_transactions() {
    let db = Database::in_memory().unwrap();
    let (checking, card) = seed_user(&db, 1);

    let range = DateRange {
        start: day(2026, 8, 1),
        end: day(2026, 9, 1),
    };
    let income = db
        .sum_transactions(&[checking, card], range, Some(AmountSign::Inflow))
        .unwrap();
    let outflow = db
        .sum_transactions(&[checking, card], range, Some(AmountSign::Outflow))
        .unwrap();
    assert_eq!(income, 2_500.0);
    assert_eq!(outflow, -825.0);

    let txs = db.account_transactions_in_range(&[card], range).unwrap();
    let manual_sum: f64 = txs.iter().map(|t| t.amount).sum();
    assert_eq!(manual_sum, -825.0);
}

// =============================================================================
// Dashboard composition
// =============================================================================

#[test]
fn test_full_dashboard_over_sqlite() {
    let db = Database::in_memory().unwrap();
    seed_user(&db, 1);
    // A second user whose data must never leak into the report
    let other_card = db
        .create_account(2, "Other Card", AccountKind::Credit, -500.0)
        .unwrap();
    db.insert_transaction(other_card, &tx(-9_000.0, day(2026, 8, 2), Some("Travel"), None))
        .unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    let report =
        DashboardComposer::new().compose(&db, 1, Timeframe::Month, fixed_now(), &mut rng);

    assert_eq!(report.timeframe, "30d");
    assert_eq!(report.summary.income, 2_500.0);
    assert_eq!(report.summary.expenses, 825.0);
    assert_eq!(report.summary.net, 1_675.0);
    // July had 750 of spending against August's 825
    assert_eq!(report.summary.expense_change, 10.0);

    assert_eq!(report.accounts.len(), 2);
    assert!(report.categories.iter().all(|c| c.category != "Travel"));
    assert_eq!(report.monthly_trend.len(), 6);
    assert!(report.monthly_trend.iter().all(|p| p.income == 2_500.0));

    // Net worth: 10000 + (-2000 as debt) = 8000 at the newest point
    let series = &report.net_worth_series;
    assert_eq!(series.len(), 6);
    let last = series.last().unwrap();
    assert!((last.net_worth - 8_000.0).abs() < 0.01);
    assert!(series[0].net_worth <= last.net_worth);
    assert!(series.iter().all(|p| p.net_worth >= networth::VALUE_FLOOR));

    assert_eq!(report.recent_transactions.len(), 10);
    assert_eq!(report.recent_transactions[0].date, day(2026, 8, 20));
}

#[test]
fn test_dashboard_for_brand_new_user() {
    let db = Database::in_memory().unwrap();

    let mut rng = StdRng::seed_from_u64(11);
    let report = DashboardComposer::new().compose(&db, 42, Timeframe::Year, fixed_now(), &mut rng);

    assert_eq!(report.summary.income, 0.0);
    assert_eq!(report.summary.expenses, 0.0);
    assert!(report.accounts.is_empty());
    assert!(report.categories.is_empty());

    // Zero-account fallback: 12 ascending monthly points from the baseline
    let series = &report.net_worth_series;
    assert_eq!(series.len(), 12);
    assert!(series.iter().all(|p| p.net_worth >= 1_000.0));
    for pair in series.windows(2) {
        assert!(pair[0].net_worth <= pair[1].net_worth);
    }
}

#[test]
fn test_deactivated_account_leaves_the_dashboard() {
    let db = Database::in_memory().unwrap();
    let (_, card) = seed_user(&db, 1);
    db.deactivate_account(card).unwrap();

    let mut rng = StdRng::seed_from_u64(3);
    let report =
        DashboardComposer::new().compose(&db, 1, Timeframe::Month, fixed_now(), &mut rng);

    assert_eq!(report.accounts.len(), 1);
    // Card spending is gone; only checking inflows remain
    assert_eq!(report.summary.expenses, 0.0);
    assert!(report.categories.is_empty());
    // Liabilities drop out of the projection too
    assert!((report.net_worth_series.last().unwrap().net_worth - 10_000.0).abs() < 0.01);
}

#[test]
fn test_relabel_shows_up_in_breakdown() {
    let db = Database::in_memory().unwrap();
    let card = db
        .create_account(1, "Card", AccountKind::Credit, 0.0)
        .unwrap();
    let tx_id = db
        .insert_transaction(card, &tx(-80.0, day(2026, 8, 10), None, None))
        .unwrap();

    let mut rng = StdRng::seed_from_u64(5);
    let before =
        DashboardComposer::new().compose(&db, 1, Timeframe::Month, fixed_now(), &mut rng);
    assert_eq!(before.categories[0].category, "Other");

    db.relabel_category(tx_id, Some("Dining")).unwrap();
    let after = DashboardComposer::new().compose(&db, 1, Timeframe::Month, fixed_now(), &mut rng);
    assert_eq!(after.categories[0].category, "Dining");
}
