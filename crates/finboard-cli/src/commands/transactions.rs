//! Transaction command implementations

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use finboard_core::models::NewTransaction;
use finboard_core::store::LedgerStore;

use super::{format_amount, open_db, truncate};

pub fn cmd_tx_add(
    db_path: &Path,
    account_id: i64,
    amount: f64,
    date: Option<&str>,
    category: Option<&str>,
    merchant: Option<&str>,
) -> Result<()> {
    let date = match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .context("Invalid --date format (use YYYY-MM-DD)")?,
        None => Utc::now().date_naive(),
    };

    let db = open_db(db_path)?;
    db.get_account(account_id)?
        .with_context(|| format!("No account with id {}", account_id))?;

    let id = db.insert_transaction(
        account_id,
        &NewTransaction {
            amount,
            date,
            category: category.map(String::from),
            merchant: merchant.map(String::from),
        },
    )?;

    println!(
        "✅ Recorded {} on {} (tx id {})",
        format_amount(amount),
        date,
        id
    );
    Ok(())
}

pub fn cmd_tx_list(db_path: &Path, user_id: i64, limit: usize) -> Result<()> {
    let db = open_db(db_path)?;
    let transactions = db.recent_transactions(user_id, limit)?;

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  finboard tx add --account 1 --amount -12.50 --category Food");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");
    for tx in transactions {
        let label = tx.category.as_deref().unwrap_or("Other");
        let merchant = tx.merchant.as_deref().unwrap_or("-");
        println!(
            "   [{}] {} │ {:>12} │ {:<16} │ {}",
            tx.id,
            tx.date,
            format_amount(tx.amount),
            truncate(label, 16),
            truncate(merchant, 24)
        );
    }
    Ok(())
}

pub fn cmd_tx_relabel(db_path: &Path, id: i64, category: Option<&str>) -> Result<()> {
    let db = open_db(db_path)?;
    db.relabel_category(id, category)?;
    match category {
        Some(c) => println!("✅ Transaction {} relabeled as \"{}\"", id, c),
        None => println!("✅ Transaction {} category cleared", id),
    }
    Ok(())
}
