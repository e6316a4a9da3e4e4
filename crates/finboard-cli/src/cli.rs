//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// finboard - ledger analytics dashboard
#[derive(Parser)]
#[command(name = "finboard")]
#[command(about = "Personal ledger analytics and dashboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "finboard.db", global = true)]
    pub db: PathBuf,

    /// User whose ledger is queried
    #[arg(long, default_value = "1", global = true)]
    pub user: i64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the ledger database
    Init,

    /// Manage accounts
    Accounts {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Manage transactions
    Tx {
        #[command(subcommand)]
        action: TxAction,
    },

    /// Print the composite dashboard report
    Dashboard {
        /// Timeframe token: 7d, 30d, 90d, 1y (unknown tokens fall back to 30d)
        #[arg(short, long, default_value = "30d")]
        timeframe: String,

        /// Emit the report as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Add an account
    Add {
        /// Account name
        #[arg(short, long)]
        name: String,

        /// Account kind: checking, savings, investment, credit
        #[arg(short, long)]
        kind: String,

        /// Opening balance (for credit accounts: negative magnitude of debt)
        #[arg(short, long, default_value = "0")]
        balance: f64,
    },

    /// List accounts, including deactivated ones
    List,

    /// Deactivate an account (soft delete; its history is kept)
    Close {
        /// Account ID
        id: i64,
    },

    /// Set an account's current balance
    SetBalance {
        /// Account ID
        id: i64,

        /// New balance
        balance: f64,
    },
}

#[derive(Subcommand)]
pub enum TxAction {
    /// Record a manual transaction
    Add {
        /// Account ID
        #[arg(short, long)]
        account: i64,

        /// Signed amount (positive = income, negative = expense)
        #[arg(long, allow_hyphen_values = true)]
        amount: f64,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Category label
        #[arg(short, long)]
        category: Option<String>,

        /// Merchant label
        #[arg(short, long)]
        merchant: Option<String>,
    },

    /// List recent transactions
    List {
        /// Maximum number of rows
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Change a transaction's category label
    Relabel {
        /// Transaction ID
        id: i64,

        /// New category (omit to clear)
        #[arg(short, long)]
        category: Option<String>,
    },
}
