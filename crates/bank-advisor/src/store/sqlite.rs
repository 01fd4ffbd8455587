//! SQLite Record Store
//!
//! Four tables keyed by account id: `users`, `transactions`,
//! `savings_account` and `loan_account`. Queries run on the blocking pool.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use super::{demo_snapshots, RecordStore};
use crate::error::{AdvisorError, Result};
use crate::model::{Account, AccountSnapshot, LoanPosition, SavingsPosition, Transaction};

const SCHEMA: &str = r"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    email TEXT,
    income REAL NOT NULL,
    expenses REAL NOT NULL,
    savings_goal REAL NOT NULL,
    risk_tolerance TEXT NOT NULL CHECK (risk_tolerance IN ('high', 'medium', 'low')),
    investment_goals TEXT,
    credit_score INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    description TEXT,
    amount REAL NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS savings_account (
    user_id INTEGER NOT NULL,
    balance REAL NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS loan_account (
    user_id INTEGER NOT NULL,
    loan_balance REAL NOT NULL,
    interest_rate REAL NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id)
);
";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Row of the `users` table before conversion to domain types
struct UserRow {
    id: i64,
    username: String,
    password: String,
    email: Option<String>,
    income: f64,
    expenses: f64,
    savings_goal: f64,
    risk_tolerance: String,
    investment_goals: Option<String>,
    credit_score: i64,
}

/// Row of the `transactions` table before conversion to domain types
struct TransactionRow {
    id: i64,
    account_id: i64,
    date: String,
    description: Option<String>,
    amount: f64,
}

fn decimal(value: f64, column: &str) -> Result<Decimal> {
    Decimal::from_f64(value)
        .ok_or_else(|| AdvisorError::InvalidRecord(format!("{column} is not a finite number")))
}

fn real(value: Decimal) -> Result<f64> {
    value
        .to_f64()
        .ok_or_else(|| AdvisorError::InvalidRecord(format!("{value} does not fit a REAL column")))
}

impl UserRow {
    fn into_account(self) -> Result<Account> {
        Ok(Account {
            id: self.id,
            risk_tolerance: self.risk_tolerance.parse().map_err(|_| {
                AdvisorError::InvalidRecord(format!(
                    "user {} has risk tolerance {:?}",
                    self.username, self.risk_tolerance
                ))
            })?,
            income: decimal(self.income, "income")?,
            expenses: decimal(self.expenses, "expenses")?,
            savings_goal: decimal(self.savings_goal, "savings_goal")?,
            username: self.username,
            password: self.password,
            email: self.email,
            investment_goals: self.investment_goals.unwrap_or_default(),
            credit_score: self.credit_score,
        })
    }
}

impl TransactionRow {
    fn into_transaction(self) -> Result<Transaction> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|e| {
            AdvisorError::InvalidRecord(format!(
                "transaction {} has date {:?}: {e}",
                self.id, self.date
            ))
        })?;

        Ok(Transaction {
            id: self.id,
            account_id: self.account_id,
            date,
            description: self.description.unwrap_or_default(),
            amount: decimal(self.amount, "amount")?,
        })
    }
}

fn find_user(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(
            "SELECT id, username, password, email, income, expenses, savings_goal,
                    risk_tolerance, investment_goals, credit_score
             FROM users WHERE username = ?1",
            params![username],
            |row| {
                Ok(UserRow {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password: row.get(2)?,
                    email: row.get(3)?,
                    income: row.get(4)?,
                    expenses: row.get(5)?,
                    savings_goal: row.get(6)?,
                    risk_tolerance: row.get(7)?,
                    investment_goals: row.get(8)?,
                    credit_score: row.get(9)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

fn load_snapshot(conn: &Connection, username: &str) -> Result<Option<AccountSnapshot>> {
    let Some(user) = find_user(conn, username)? else {
        return Ok(None);
    };
    let account = user.into_account()?;

    let mut stmt = conn.prepare(
        "SELECT id, user_id, date, description, amount
         FROM transactions WHERE user_id = ?1
         ORDER BY date DESC, id DESC",
    )?;
    let transactions = stmt
        .query_map(params![account.id], |row| {
            Ok(TransactionRow {
                id: row.get(0)?,
                account_id: row.get(1)?,
                date: row.get(2)?,
                description: row.get(3)?,
                amount: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?
        .into_iter()
        .map(TransactionRow::into_transaction)
        .collect::<Result<Vec<_>>>()?;

    let savings: Option<f64> = conn
        .query_row(
            "SELECT balance FROM savings_account WHERE user_id = ?1",
            params![account.id],
            |row| row.get(0),
        )
        .optional()?;
    let savings = savings.ok_or_else(|| AdvisorError::IncompleteRecord {
        username: account.username.clone(),
        missing: "savings account",
    })?;

    let loan: Option<(f64, f64)> = conn
        .query_row(
            "SELECT loan_balance, interest_rate FROM loan_account WHERE user_id = ?1",
            params![account.id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    let (loan_balance, interest_rate) = loan.ok_or_else(|| AdvisorError::IncompleteRecord {
        username: account.username.clone(),
        missing: "loan account",
    })?;

    Ok(Some(AccountSnapshot {
        account,
        transactions,
        savings: SavingsPosition {
            balance: decimal(savings, "balance")?,
        },
        loan: LoanPosition {
            balance: decimal(loan_balance, "loan_balance")?,
            interest_rate: decimal(interest_rate, "interest_rate")?,
        },
    }))
}

/// SQLite-backed record store
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (creating if needed) the database file and ensure the schema exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Private in-memory database, mostly for tests
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AdvisorError::Storage("connection lock poisoned".into()))
    }

    /// Run a query on the blocking pool
    async fn run<T, F>(&self, task: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let conn = store.lock()?;
            task(&conn)
        })
        .await
        .map_err(|e| AdvisorError::Storage(format!("storage task failed: {e}")))?
    }

    /// Insert an account with its transactions, savings and loan in one
    /// transaction. Ids in the snapshot are ignored; returns the new account id.
    pub fn provision(&self, snapshot: &AccountSnapshot) -> Result<i64> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let account = &snapshot.account;

        tx.execute(
            "INSERT INTO users (username, password, email, income, expenses, savings_goal,
                                risk_tolerance, investment_goals, credit_score)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                account.username,
                account.password,
                account.email,
                real(account.income)?,
                real(account.expenses)?,
                real(account.savings_goal)?,
                account.risk_tolerance.as_str(),
                account.investment_goals,
                account.credit_score,
            ],
        )?;
        let account_id = tx.last_insert_rowid();

        for entry in &snapshot.transactions {
            tx.execute(
                "INSERT INTO transactions (user_id, date, description, amount)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    account_id,
                    entry.date.format(DATE_FORMAT).to_string(),
                    entry.description,
                    real(entry.amount)?,
                ],
            )?;
        }

        tx.execute(
            "INSERT INTO savings_account (user_id, balance) VALUES (?1, ?2)",
            params![account_id, real(snapshot.savings.balance)?],
        )?;
        tx.execute(
            "INSERT INTO loan_account (user_id, loan_balance, interest_rate) VALUES (?1, ?2, ?3)",
            params![
                account_id,
                real(snapshot.loan.balance)?,
                real(snapshot.loan.interest_rate)?,
            ],
        )?;

        tx.commit()?;
        tracing::info!(username = %account.username, account_id, "Provisioned account");
        Ok(account_id)
    }

    /// Insert the demo customers when the users table is empty.
    /// Returns how many accounts were added.
    pub fn seed_demo_data(&self) -> Result<usize> {
        let existing: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        if existing > 0 {
            tracing::debug!(existing, "Skipping demo seed, users already present");
            return Ok(0);
        }

        let snapshots = demo_snapshots();
        for snapshot in &snapshots {
            self.provision(snapshot)?;
        }
        Ok(snapshots.len())
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let (username, password) = (username.to_owned(), password.to_owned());
        self.run(move |conn| {
            let found = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1 AND password = ?2)",
                params![username, password],
                |row| row.get(0),
            )?;
            Ok(found)
        })
        .await
    }

    async fn load_snapshot(&self, username: &str) -> Result<Option<AccountSnapshot>> {
        let username = username.to_owned();
        self.run(move |conn| load_snapshot(conn, &username)).await
    }

    async fn health_check(&self) -> bool {
        self.run(|conn| Ok(conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?))
            .await
            .is_ok()
    }

    fn name(&self) -> &str {
        "SQLite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RiskTolerance;
    use rust_decimal_macros::dec;

    fn seeded() -> SqliteStore {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.seed_demo_data().unwrap(), 2);
        store
    }

    #[tokio::test]
    async fn test_load_snapshot() {
        let store = seeded();
        let snapshot = store.load_snapshot("priya").await.unwrap().unwrap();

        assert_eq!(snapshot.account.username, "priya");
        assert_eq!(snapshot.account.risk_tolerance, RiskTolerance::Medium);
        assert_eq!(snapshot.account.income, dec!(6000));
        assert_eq!(snapshot.account.credit_score, 720);
        assert_eq!(snapshot.savings.balance, dec!(8000));
        assert_eq!(snapshot.loan.balance, dec!(2500));
        assert_eq!(snapshot.loan.interest_rate, dec!(5.5));
        assert_eq!(snapshot.transactions.len(), 5);
        assert!(snapshot
            .transactions
            .iter()
            .all(|t| t.account_id == snapshot.account.id));
    }

    #[tokio::test]
    async fn test_transactions_most_recent_first() {
        let store = seeded();
        let snapshot = store.load_snapshot("priya1").await.unwrap().unwrap();
        let descriptions: Vec<_> = snapshot
            .transactions
            .iter()
            .map(|t| t.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            ["Shopping Mall", "Internet Bill", "Salary", "Dining Out", "Movie Tickets"]
        );
    }

    #[tokio::test]
    async fn test_unknown_user_is_none() {
        let store = seeded();
        assert!(store.load_snapshot("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let store = seeded();
        assert!(store.authenticate("priya", "password123").await.unwrap());
        assert!(!store.authenticate("priya", "password456").await.unwrap());
        assert!(!store.authenticate("nobody", "password123").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_loan_is_incomplete() {
        let store = seeded();
        store
            .lock()
            .unwrap()
            .execute("DELETE FROM loan_account WHERE user_id = 1", [])
            .unwrap();

        let err = store.load_snapshot("priya").await.unwrap_err();
        assert!(matches!(
            err,
            AdvisorError::IncompleteRecord { missing: "loan account", .. }
        ));
        assert!(err.is_data_error());
    }

    #[tokio::test]
    async fn test_malformed_date_is_invalid() {
        let store = seeded();
        store
            .lock()
            .unwrap()
            .execute(
                "UPDATE transactions SET date = '03/04/2025' WHERE description = 'Salary'",
                [],
            )
            .unwrap();

        let err = store.load_snapshot("priya").await.unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidRecord(_)));
        assert!(err.is_data_error());
    }

    #[tokio::test]
    async fn test_legacy_table_with_unknown_risk_tolerance() {
        // Databases created before the CHECK constraint can hold any tag
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                email TEXT,
                income REAL NOT NULL,
                expenses REAL NOT NULL,
                savings_goal REAL NOT NULL,
                risk_tolerance TEXT NOT NULL,
                investment_goals TEXT,
                credit_score INTEGER NOT NULL
            );
            INSERT INTO users (username, password, income, expenses, savings_goal,
                               risk_tolerance, credit_score)
            VALUES ('sam', 'pw', 3000, 1000, 5000, 'reckless', 600);",
        )
        .unwrap();
        let store = SqliteStore::from_connection(conn).unwrap();
        store
            .lock()
            .unwrap()
            .execute_batch(
                "INSERT INTO savings_account (user_id, balance) VALUES (1, 100);
                 INSERT INTO loan_account (user_id, loan_balance, interest_rate)
                 VALUES (1, 100, 4.0);",
            )
            .unwrap();

        assert!(store.authenticate("sam", "pw").await.unwrap());
        let err = store.load_snapshot("sam").await.unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidRecord(ref msg) if msg.contains("reckless")));
        assert!(err.is_data_error());
    }

    #[test]
    fn test_schema_rejects_unknown_risk_tolerance() {
        let store = seeded();
        let result = store.lock().unwrap().execute(
            "INSERT INTO users (username, password, income, expenses, savings_goal,
                                risk_tolerance, credit_score)
             VALUES ('sam', 'pw', 1, 1, 1, 'reckless', 600)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_seed_is_idempotent() {
        let store = seeded();
        assert_eq!(store.seed_demo_data().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_health_check() {
        assert!(seeded().health_check().await);
    }
}
