//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `accounts` - Account management commands (add, list, close, set-balance)
//! - `dashboard` - Dashboard report command
//! - `transactions` - Transaction commands (add, list, relabel)

pub mod accounts;
pub mod dashboard;
pub mod transactions;

// Re-export command functions for main.rs
pub use accounts::*;
pub use dashboard::*;
pub use transactions::*;

use std::path::Path;

use anyhow::{Context, Result};
use finboard_core::store::Database;

/// Open the ledger database, creating it if necessary
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());
    open_db(db_path)?;
    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add an account:       finboard accounts add --name Checking --kind checking");
    println!("  2. Record transactions:  finboard tx add --account 1 --amount -12.50");
    println!("  3. View the dashboard:   finboard dashboard --timeframe 30d");
    Ok(())
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}

/// Format a signed amount with ANSI color (red expenses, green income)
pub fn format_amount(amount: f64) -> String {
    if amount < 0.0 {
        format!("\x1b[31m${:.2}\x1b[0m", amount.abs())
    } else {
        format!("\x1b[32m+${:.2}\x1b[0m", amount)
    }
}
