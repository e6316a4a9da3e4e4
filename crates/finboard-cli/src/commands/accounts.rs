//! Account command implementations

use std::path::Path;

use anyhow::{Context, Result};
use finboard_core::models::AccountKind;

use super::{format_amount, open_db};

pub fn cmd_accounts_add(
    db_path: &Path,
    user_id: i64,
    name: &str,
    kind: &str,
    balance: f64,
) -> Result<()> {
    let kind: AccountKind = kind
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("Expected one of: checking, savings, investment, credit")?;

    let db = open_db(db_path)?;
    let id = db.create_account(user_id, name, kind, balance)?;

    println!("✅ Added {} account \"{}\" (id {})", kind, name, id);
    Ok(())
}

pub fn cmd_accounts_list(db_path: &Path, user_id: i64) -> Result<()> {
    let db = open_db(db_path)?;
    let accounts = db.list_accounts(user_id)?;

    if accounts.is_empty() {
        println!("No accounts yet. Add one with:");
        println!("  finboard accounts add --name Checking --kind checking");
        return Ok(());
    }

    println!();
    println!("🏦 Accounts");
    println!("   ─────────────────────────────────────────────────────────────");
    for account in accounts {
        let status = if account.active { "" } else { " (closed)" };
        println!(
            "   [{}] {:<24} {:>10} │ {}{}",
            account.id,
            account.name,
            format!("{:.2}", account.balance),
            account.kind,
            status
        );
    }
    Ok(())
}

pub fn cmd_accounts_close(db_path: &Path, id: i64) -> Result<()> {
    let db = open_db(db_path)?;
    db.deactivate_account(id)?;
    println!("✅ Account {} closed. Its history is kept but it no longer counts.", id);
    Ok(())
}

pub fn cmd_accounts_set_balance(db_path: &Path, id: i64, balance: f64) -> Result<()> {
    let db = open_db(db_path)?;
    db.update_balance(id, balance)?;
    println!("✅ Account {} balance set to {}", id, format_amount(balance));
    Ok(())
}
