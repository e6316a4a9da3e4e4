//! finboard CLI - ledger analytics dashboard
//!
//! Usage:
//!   finboard init                         Initialize database
//!   finboard accounts add --name X ...    Add an account
//!   finboard tx add --account 1 ...       Record a transaction
//!   finboard dashboard --timeframe 30d    Print the dashboard report

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Accounts { action } => match action {
            AccountAction::Add {
                name,
                kind,
                balance,
            } => commands::cmd_accounts_add(&cli.db, cli.user, &name, &kind, balance),
            AccountAction::List => commands::cmd_accounts_list(&cli.db, cli.user),
            AccountAction::Close { id } => commands::cmd_accounts_close(&cli.db, id),
            AccountAction::SetBalance { id, balance } => {
                commands::cmd_accounts_set_balance(&cli.db, id, balance)
            }
        },
        Commands::Tx { action } => match action {
            TxAction::Add {
                account,
                amount,
                date,
                category,
                merchant,
            } => commands::cmd_tx_add(
                &cli.db,
                account,
                amount,
                date.as_deref(),
                category.as_deref(),
                merchant.as_deref(),
            ),
            TxAction::List { limit } => commands::cmd_tx_list(&cli.db, cli.user, limit),
            TxAction::Relabel { id, category } => {
                commands::cmd_tx_relabel(&cli.db, id, category.as_deref())
            }
        },
        Commands::Dashboard { timeframe, json } => {
            commands::cmd_dashboard(&cli.db, cli.user, &timeframe, json)
        }
    }
}
