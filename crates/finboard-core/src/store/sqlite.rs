//! SQLite-backed ledger store with connection pooling and migrations

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Row};
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{Account, AccountKind, NewTransaction, Transaction};
use crate::store::{AmountSign, LedgerStore};
use crate::timeframe::DateRange;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|_| Utc::now().date_naive())
}

/// Ledger database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) a ledger database at the given path
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing).
    ///
    /// Uses a temporary file rather than `:memory:` because every pooled
    /// connection to `:memory:` would see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!(
            "{}/finboard_test_{}_{}.db",
            std::env::temp_dir().display(),
            std::process::id(),
            id
        );

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                balance REAL NOT NULL DEFAULT 0,
                active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL REFERENCES accounts(id),
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                category TEXT,
                merchant TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_accounts_user ON accounts(user_id);
            CREATE INDEX IF NOT EXISTS idx_transactions_account_date
                ON transactions(account_id, date);
            "#,
        )?;
        info!(path = %self.db_path, "Ledger database ready");
        Ok(())
    }

    fn map_account(row: &Row<'_>) -> rusqlite::Result<Account> {
        let kind_str: String = row.get(3)?;
        let created_at_str: String = row.get(6)?;
        Ok(Account {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            kind: kind_str.parse().unwrap_or(AccountKind::Checking),
            balance: row.get(4)?,
            active: row.get::<_, i64>(5)? != 0,
            created_at: parse_datetime(&created_at_str),
        })
    }

    fn map_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
        let date_str: String = row.get(3)?;
        let created_at_str: String = row.get(6)?;
        Ok(Transaction {
            id: row.get(0)?,
            account_id: row.get(1)?,
            amount: row.get(2)?,
            date: parse_date(&date_str),
            category: row.get(4)?,
            merchant: row.get(5)?,
            created_at: parse_datetime(&created_at_str),
        })
    }

    /// Create an account for a user
    pub fn create_account(
        &self,
        user_id: i64,
        name: &str,
        kind: AccountKind,
        balance: f64,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO accounts (user_id, name, kind, balance) VALUES (?, ?, ?, ?)",
            params![user_id, name, kind.as_str(), balance],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get an account by ID
    pub fn get_account(&self, id: i64) -> Result<Option<Account>> {
        let conn = self.conn()?;
        let account = conn
            .query_row(
                "SELECT id, user_id, name, kind, balance, active, created_at
                 FROM accounts WHERE id = ?",
                params![id],
                Self::map_account,
            )
            .ok();
        Ok(account)
    }

    /// List all of a user's accounts, active or not
    pub fn list_accounts(&self, user_id: i64) -> Result<Vec<Account>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, kind, balance, active, created_at
             FROM accounts WHERE user_id = ? ORDER BY name",
        )?;
        let accounts = stmt
            .query_map(params![user_id], Self::map_account)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(accounts)
    }

    /// Soft-delete an account. The row and its transactions stay; the
    /// account simply stops contributing to aggregates.
    pub fn deactivate_account(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute("UPDATE accounts SET active = 0 WHERE id = ?", params![id])?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Account not found: {}", id)));
        }
        Ok(())
    }

    /// Set an account's current balance (upstream sync or manual correction)
    pub fn update_balance(&self, id: i64, balance: f64) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE accounts SET balance = ? WHERE id = ?",
            params![balance, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Account not found: {}", id)));
        }
        Ok(())
    }

    /// Record a transaction against an account
    pub fn insert_transaction(&self, account_id: i64, tx: &NewTransaction) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO transactions (account_id, amount, date, category, merchant)
             VALUES (?, ?, ?, ?, ?)",
            params![
                account_id,
                tx.amount,
                tx.date.to_string(),
                tx.category,
                tx.merchant
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Edit a manually-entered transaction
    pub fn update_transaction(&self, id: i64, tx: &NewTransaction) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE transactions SET amount = ?, date = ?, category = ?, merchant = ?
             WHERE id = ?",
            params![tx.amount, tx.date.to_string(), tx.category, tx.merchant, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Transaction not found: {}", id)));
        }
        Ok(())
    }

    /// Relabel a transaction's category. The only mutation allowed on
    /// transactions synced from an external source.
    pub fn relabel_category(&self, id: i64, category: Option<&str>) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE transactions SET category = ? WHERE id = ?",
            params![category, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Transaction not found: {}", id)));
        }
        Ok(())
    }

    /// Build a `?, ?, ...` placeholder list for an IN clause
    fn placeholders(n: usize) -> String {
        let mut s = String::from("?");
        for _ in 1..n {
            s.push_str(", ?");
        }
        s
    }
}

impl LedgerStore for Database {
    fn active_accounts(&self, user_id: i64) -> Result<Vec<Account>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, kind, balance, active, created_at
             FROM accounts WHERE user_id = ? AND active = 1 ORDER BY name",
        )?;
        let accounts = stmt
            .query_map(params![user_id], Self::map_account)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(accounts)
    }

    fn transactions_in_range(&self, user_id: i64, range: DateRange) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT t.id, t.account_id, t.amount, t.date, t.category, t.merchant, t.created_at
             FROM transactions t
             JOIN accounts a ON a.id = t.account_id
             WHERE a.user_id = ?1 AND a.active = 1
               AND t.date >= ?2 AND t.date < ?3
             ORDER BY t.date, t.id",
        )?;
        let transactions = stmt
            .query_map(
                params![user_id, range.start.to_string(), range.end.to_string()],
                Self::map_transaction,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    fn account_transactions_in_range(
        &self,
        account_ids: &[i64],
        range: DateRange,
    ) -> Result<Vec<Transaction>> {
        if account_ids.is_empty() {
            return Ok(vec![]);
        }
        let conn = self.conn()?;
        let sql = format!(
            "SELECT id, account_id, amount, date, category, merchant, created_at
             FROM transactions
             WHERE account_id IN ({}) AND date >= ? AND date < ?
             ORDER BY date, id",
            Self::placeholders(account_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;

        let mut query_params: Vec<Box<dyn rusqlite::ToSql>> = account_ids
            .iter()
            .map(|id| Box::new(*id) as Box<dyn rusqlite::ToSql>)
            .collect();
        query_params.push(Box::new(range.start.to_string()));
        query_params.push(Box::new(range.end.to_string()));
        let param_refs: Vec<&dyn rusqlite::ToSql> =
            query_params.iter().map(|p| p.as_ref()).collect();

        let transactions = stmt
            .query_map(param_refs.as_slice(), Self::map_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    fn sum_transactions(
        &self,
        account_ids: &[i64],
        range: DateRange,
        sign: Option<AmountSign>,
    ) -> Result<f64> {
        if account_ids.is_empty() {
            return Ok(0.0);
        }
        let conn = self.conn()?;
        let sign_clause = match sign {
            Some(AmountSign::Inflow) => "AND amount > 0",
            Some(AmountSign::Outflow) => "AND amount < 0",
            None => "",
        };
        let sql = format!(
            "SELECT COALESCE(SUM(amount), 0)
             FROM transactions
             WHERE account_id IN ({}) AND date >= ? AND date < ? {}",
            Self::placeholders(account_ids.len()),
            sign_clause
        );
        let mut stmt = conn.prepare(&sql)?;

        let mut query_params: Vec<Box<dyn rusqlite::ToSql>> = account_ids
            .iter()
            .map(|id| Box::new(*id) as Box<dyn rusqlite::ToSql>)
            .collect();
        query_params.push(Box::new(range.start.to_string()));
        query_params.push(Box::new(range.end.to_string()));
        let param_refs: Vec<&dyn rusqlite::ToSql> =
            query_params.iter().map(|p| p.as_ref()).collect();

        let sum: f64 = stmt.query_row(param_refs.as_slice(), |row| row.get(0))?;
        Ok(sum)
    }

    fn recent_transactions(&self, user_id: i64, limit: usize) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT t.id, t.account_id, t.amount, t.date, t.category, t.merchant, t.created_at
             FROM transactions t
             JOIN accounts a ON a.id = t.account_id
             WHERE a.user_id = ?1 AND a.active = 1
             ORDER BY t.date DESC, t.id DESC
             LIMIT ?2",
        )?;
        let transactions = stmt
            .query_map(params![user_id, limit as i64], Self::map_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }
}
