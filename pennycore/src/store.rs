//! SQLite-backed store for the pennywise ledger.
//!
//! One `Store` owns the connection; the service modules (`accounts`,
//! `ledger`, `currencies`, ...) add their operations as further `impl Store`
//! blocks. The schema is created on open, so a fresh database file is ready
//! to use without a separate migration step.
//!
use std::path::Path;

use rusqlite::{Connection, Row};

use crate::error::Result;
use crate::model::{
    Account, AccountType, Category, Currency, CurrencyKind, ImportFormat, Pot, Recurrence,
    Scenario, ScenarioTransaction, ScheduledTransaction, Transaction, TransactionLeg, User,
};
use crate::money::Amount;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS currencies (
      id INTEGER PRIMARY KEY,
      code TEXT NOT NULL UNIQUE,
      name TEXT NOT NULL,
      symbol TEXT NOT NULL,
      kind TEXT NOT NULL,
      decimals INTEGER NOT NULL DEFAULT 2,
      is_active INTEGER NOT NULL DEFAULT 1
    );
    CREATE TABLE IF NOT EXISTS exchange_rates (
      id INTEGER PRIMARY KEY,
      from_currency_id INTEGER NOT NULL REFERENCES currencies(id),
      to_currency_id INTEGER NOT NULL REFERENCES currencies(id),
      rate REAL NOT NULL,
      timestamp TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS accounts (
      id INTEGER PRIMARY KEY,
      name TEXT NOT NULL,
      account_type TEXT NOT NULL DEFAULT 'current',
      currency_id INTEGER NOT NULL REFERENCES currencies(id),
      balance INTEGER NOT NULL DEFAULT 0,
      is_external INTEGER NOT NULL DEFAULT 0,
      interest_rate REAL,
      interest_compounding TEXT,
      minimum_payment INTEGER,
      overdraft_limit INTEGER,
      overdraft_interest_rate REAL
    );
    CREATE TABLE IF NOT EXISTS pots (
      id INTEGER PRIMARY KEY,
      name TEXT NOT NULL,
      target_amount INTEGER NOT NULL DEFAULT 0,
      current_amount INTEGER NOT NULL DEFAULT 0,
      is_active INTEGER NOT NULL DEFAULT 1,
      account_id INTEGER NOT NULL REFERENCES accounts(id)
    );
    CREATE TABLE IF NOT EXISTS categories (
      id INTEGER PRIMARY KEY,
      name TEXT NOT NULL,
      parent_id INTEGER REFERENCES categories(id)
    );
    CREATE TABLE IF NOT EXISTS transactions (
      id INTEGER PRIMARY KEY,
      description TEXT NOT NULL DEFAULT '',
      date TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS transaction_legs (
      id INTEGER PRIMARY KEY,
      transaction_id INTEGER NOT NULL REFERENCES transactions(id),
      account_id INTEGER NOT NULL REFERENCES accounts(id),
      pot_id INTEGER REFERENCES pots(id),
      debit INTEGER,
      credit INTEGER,
      CHECK ((debit IS NULL) != (credit IS NULL))
    );
    CREATE TABLE IF NOT EXISTS scheduled_transactions (
      id INTEGER PRIMARY KEY,
      description TEXT NOT NULL DEFAULT '',
      amount INTEGER NOT NULL,
      from_account_id INTEGER NOT NULL REFERENCES accounts(id),
      to_account_id INTEGER NOT NULL REFERENCES accounts(id),
      from_pot_id INTEGER REFERENCES pots(id),
      to_pot_id INTEGER REFERENCES pots(id),
      recurrence TEXT NOT NULL DEFAULT 'monthly',
      custom_rule TEXT,
      start_date TEXT NOT NULL,
      end_date TEXT,
      shift_for_holidays INTEGER NOT NULL DEFAULT 1,
      is_active INTEGER NOT NULL DEFAULT 1
    );
    CREATE TABLE IF NOT EXISTS users (
      id INTEGER PRIMARY KEY,
      username TEXT NOT NULL UNIQUE,
      password_hash TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS scenarios (
      id INTEGER PRIMARY KEY,
      name TEXT NOT NULL,
      description TEXT
    );
    CREATE TABLE IF NOT EXISTS scenario_transactions (
      id INTEGER PRIMARY KEY,
      scenario_id INTEGER NOT NULL REFERENCES scenarios(id),
      date TEXT NOT NULL,
      description TEXT NOT NULL DEFAULT '',
      amount INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS import_formats (
      id INTEGER PRIMARY KEY,
      name TEXT NOT NULL UNIQUE,
      date_column TEXT NOT NULL,
      amount_column TEXT NOT NULL,
      description_column TEXT NOT NULL,
      type_column TEXT,
      balance_column TEXT,
      reference_column TEXT,
      date_format TEXT NOT NULL DEFAULT '%Y-%m-%d',
      thousands_separator TEXT NOT NULL DEFAULT ',',
      decimal_separator TEXT NOT NULL DEFAULT '.',
      currency_symbol TEXT NOT NULL DEFAULT '',
      encoding TEXT NOT NULL DEFAULT 'utf-8-sig',
      notes TEXT,
      account_id INTEGER UNIQUE REFERENCES accounts(id)
    );
";

/// Owns the SQLite connection behind all ledger operations.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Store> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Store> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn })
    }
}

// Row mappers shared by the service modules.

pub(crate) fn currency_from_row(row: &Row) -> rusqlite::Result<Currency> {
    Ok(Currency {
        id: row.get("id")?,
        code: row.get("code")?,
        name: row.get("name")?,
        symbol: row.get("symbol")?,
        kind: CurrencyKind::parse(&row.get::<_, String>("kind")?)
            .unwrap_or(CurrencyKind::Fiat),
        decimals: row.get("decimals")?,
        is_active: row.get("is_active")?,
    })
}

pub(crate) fn account_from_row(row: &Row) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get("id")?,
        name: row.get("name")?,
        account_type: AccountType::parse(&row.get::<_, String>("account_type")?)
            .unwrap_or(AccountType::Current),
        currency_id: row.get("currency_id")?,
        balance: Amount(row.get("balance")?),
        is_external: row.get("is_external")?,
        interest_rate: row.get("interest_rate")?,
        interest_compounding: row.get("interest_compounding")?,
        minimum_payment: row.get::<_, Option<i64>>("minimum_payment")?.map(Amount),
        overdraft_limit: row.get::<_, Option<i64>>("overdraft_limit")?.map(Amount),
        overdraft_interest_rate: row.get("overdraft_interest_rate")?,
    })
}

pub(crate) fn pot_from_row(row: &Row) -> rusqlite::Result<Pot> {
    Ok(Pot {
        id: row.get("id")?,
        name: row.get("name")?,
        target_amount: Amount(row.get("target_amount")?),
        current_amount: Amount(row.get("current_amount")?),
        is_active: row.get("is_active")?,
        account_id: row.get("account_id")?,
    })
}

pub(crate) fn category_from_row(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
        parent_id: row.get("parent_id")?,
    })
}

pub(crate) fn transaction_from_row(row: &Row) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get("id")?,
        description: row.get("description")?,
        date: row.get("date")?,
    })
}

pub(crate) fn leg_from_row(row: &Row) -> rusqlite::Result<TransactionLeg> {
    Ok(TransactionLeg {
        id: row.get("id")?,
        transaction_id: row.get("transaction_id")?,
        account_id: row.get("account_id")?,
        pot_id: row.get("pot_id")?,
        debit: row.get::<_, Option<i64>>("debit")?.map(Amount),
        credit: row.get::<_, Option<i64>>("credit")?.map(Amount),
    })
}

pub(crate) fn scheduled_from_row(row: &Row) -> rusqlite::Result<ScheduledTransaction> {
    Ok(ScheduledTransaction {
        id: row.get("id")?,
        description: row.get("description")?,
        amount: Amount(row.get("amount")?),
        from_account_id: row.get("from_account_id")?,
        to_account_id: row.get("to_account_id")?,
        from_pot_id: row.get("from_pot_id")?,
        to_pot_id: row.get("to_pot_id")?,
        recurrence: Recurrence::parse(&row.get::<_, String>("recurrence")?)
            .unwrap_or(Recurrence::Monthly),
        custom_rule: row.get("custom_rule")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        shift_for_holidays: row.get("shift_for_holidays")?,
        is_active: row.get("is_active")?,
    })
}

pub(crate) fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        password_hash: row.get("password_hash")?,
    })
}

pub(crate) fn scenario_from_row(row: &Row) -> rusqlite::Result<Scenario> {
    Ok(Scenario {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
    })
}

pub(crate) fn scenario_transaction_from_row(row: &Row) -> rusqlite::Result<ScenarioTransaction> {
    Ok(ScenarioTransaction {
        id: row.get("id")?,
        scenario_id: row.get("scenario_id")?,
        date: row.get("date")?,
        description: row.get("description")?,
        amount: Amount(row.get("amount")?),
    })
}

pub(crate) fn format_from_row(row: &Row) -> rusqlite::Result<ImportFormat> {
    Ok(ImportFormat {
        id: row.get("id")?,
        name: row.get("name")?,
        date_column: row.get("date_column")?,
        amount_column: row.get("amount_column")?,
        description_column: row.get("description_column")?,
        type_column: row.get("type_column")?,
        balance_column: row.get("balance_column")?,
        reference_column: row.get("reference_column")?,
        date_format: row.get("date_format")?,
        thousands_separator: row.get("thousands_separator")?,
        decimal_separator: row.get("decimal_separator")?,
        currency_symbol: row.get("currency_symbol")?,
        encoding: row.get("encoding")?,
        notes: row.get("notes")?,
        account_id: row.get("account_id")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_on_open() {
        let store = Store::open_in_memory().unwrap();
        let n: i64 = store
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(n >= 9);
    }

    #[test]
    fn schema_is_idempotent_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.db");
        drop(Store::open(&path).unwrap());
        // Reopening an existing file must not fail or wipe tables.
        drop(Store::open(&path).unwrap());
    }
}
