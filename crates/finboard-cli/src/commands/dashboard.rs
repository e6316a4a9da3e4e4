//! Dashboard report command

use std::path::Path;

use anyhow::Result;
use finboard_core::dashboard::DashboardComposer;
use finboard_core::models::DashboardReport;

use super::{format_amount, open_db, truncate};

pub fn cmd_dashboard(db_path: &Path, user_id: i64, timeframe: &str, json: bool) -> Result<()> {
    let db = open_db(db_path)?;
    let report = DashboardComposer::new().compose_now(&db, user_id, Some(timeframe));

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &DashboardReport) {
    println!();
    println!(
        "📊 Dashboard ({}, {} → {})",
        report.timeframe, report.period.from, report.period.to
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Income   {:>12}   ({:+.1}%)",
        format!("${:.2}", report.summary.income),
        report.summary.income_change
    );
    println!(
        "   Expenses {:>12}   ({:+.1}%)",
        format!("${:.2}", report.summary.expenses),
        report.summary.expense_change
    );
    println!(
        "   Net      {:>12}   (investments {:+.1}%)",
        format!("${:.2}", report.summary.net),
        report.summary.investment_change
    );

    if !report.accounts.is_empty() {
        println!();
        println!("🏦 Accounts");
        for account in &report.accounts {
            println!(
                "   {:<24} {:>12} │ activity {:>10} ({:+.1}%)",
                truncate(&account.name, 24),
                format!("${:.2}", account.balance),
                format!("{:.2}", account.activity),
                account.activity_change
            );
        }
    }

    if !report.categories.is_empty() {
        println!();
        println!("🧾 Top Spending Categories");
        for category in &report.categories {
            println!(
                "   {:<20} {:>10}  {:>5.1}%  ({} txs)",
                truncate(&category.category, 20),
                format!("${:.2}", category.amount),
                category.percentage,
                category.transaction_count
            );
        }
    }

    if !report.monthly_trend.is_empty() {
        println!();
        println!("📅 6-Month Trend (income / expenses)");
        for point in &report.monthly_trend {
            println!(
                "   {:<4} {:>12} / {:>12}",
                point.month,
                format!("${:.2}", point.income),
                format!("${:.2}", point.expenses)
            );
        }
    }

    println!();
    println!("📈 Net Worth");
    for point in &report.net_worth_series {
        println!(
            "   {:<8} {:>14}  (assets {:>12}, debts {:>10})",
            point.label,
            format!("${:.2}", point.net_worth),
            format!("${:.2}", point.assets),
            format!("${:.2}", point.liabilities)
        );
    }

    if !report.recent_transactions.is_empty() {
        println!();
        println!("📝 Recent Transactions");
        for tx in &report.recent_transactions {
            let label = tx.category.as_deref().unwrap_or("Other");
            println!(
                "   {} │ {:>12} │ {}",
                tx.date,
                format_amount(tx.amount),
                truncate(label, 24)
            );
        }
    }
}
