//! Account and savings-pot operations.
//!
use rusqlite::{OptionalExtension, params};

use crate::error::{PennyError, Result};
use crate::model::{Account, AccountType, Pot};
use crate::money::Amount;
use crate::store::{Store, account_from_row, pot_from_row};

/// Fields accepted when opening an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub account_type: AccountType,
    pub currency_id: i64,
    pub balance: Amount,
    pub is_external: bool,
    pub interest_rate: Option<f64>,
    pub interest_compounding: Option<String>,
    pub minimum_payment: Option<Amount>,
    pub overdraft_limit: Option<Amount>,
    pub overdraft_interest_rate: Option<f64>,
}

impl NewAccount {
    pub fn new(name: &str, account_type: AccountType, currency_id: i64) -> NewAccount {
        NewAccount {
            name: name.to_string(),
            account_type,
            currency_id,
            balance: Amount::ZERO,
            is_external: false,
            interest_rate: None,
            interest_compounding: None,
            minimum_payment: None,
            overdraft_limit: None,
            overdraft_interest_rate: None,
        }
    }

    pub fn with_balance(mut self, balance: Amount) -> NewAccount {
        self.balance = balance;
        self
    }

    pub fn external(mut self) -> NewAccount {
        self.is_external = true;
        self
    }
}

impl Store {
    /// Open a new account in an existing currency.
    pub fn create_account(&self, new: NewAccount) -> Result<Account> {
        if self.currency_by_id(new.currency_id)?.is_none() {
            return Err(PennyError::NotFound("currency"));
        }
        if new.name.trim().is_empty() {
            return Err(PennyError::invalid("account name must not be empty"));
        }
        self.conn.execute(
            "INSERT INTO accounts (name, account_type, currency_id, balance, is_external,
                                   interest_rate, interest_compounding, minimum_payment,
                                   overdraft_limit, overdraft_interest_rate)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                new.name,
                new.account_type.as_str(),
                new.currency_id,
                new.balance.minor(),
                new.is_external,
                new.interest_rate,
                new.interest_compounding,
                new.minimum_payment.map(Amount::minor),
                new.overdraft_limit.map(Amount::minor),
                new.overdraft_interest_rate,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.account(id)?.ok_or(PennyError::NotFound("account"))
    }

    pub fn account(&self, id: i64) -> Result<Option<Account>> {
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM accounts WHERE id = ?1",
                params![id],
                account_from_row,
            )
            .optional()?)
    }

    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        let mut stmt = self.conn.prepare("SELECT * FROM accounts ORDER BY id")?;
        let rows = stmt.query_map([], account_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Create a savings pot inside an account.
    ///
    /// An `initial_amount` is moved from the account's free balance into the
    /// pot immediately, so it must be covered by the available balance.
    pub fn create_pot(
        &mut self,
        account_id: i64,
        name: &str,
        target_amount: Amount,
        initial_amount: Amount,
    ) -> Result<Pot> {
        let account = self
            .account(account_id)?
            .ok_or(PennyError::NotFound("account"))?;
        if initial_amount.is_negative() || target_amount.is_negative() {
            return Err(PennyError::invalid("pot amounts must not be negative"));
        }
        let available = self.available_balance(account.id)?;
        if initial_amount > available {
            return Err(PennyError::invalid("insufficient free balance to fund pot"));
        }
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO pots (name, target_amount, current_amount, is_active, account_id)
             VALUES (?1, ?2, ?3, 1, ?4)",
            params![
                name,
                target_amount.minor(),
                initial_amount.minor(),
                account_id
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        self.pot(id)?.ok_or(PennyError::NotFound("pot"))
    }

    pub fn pot(&self, id: i64) -> Result<Option<Pot>> {
        Ok(self
            .conn
            .query_row("SELECT * FROM pots WHERE id = ?1", params![id], pot_from_row)
            .optional()?)
    }

    pub fn pots_of_account(&self, account_id: i64) -> Result<Vec<Pot>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM pots WHERE account_id = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![account_id], pot_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Sum of the account's active pot holdings.
    pub fn pot_holdings(&self, account_id: i64) -> Result<Amount> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(current_amount), 0) FROM pots
             WHERE account_id = ?1 AND is_active = 1",
            params![account_id],
            |row| row.get(0),
        )?;
        Ok(Amount(total))
    }

    /// Balance not ring-fenced in pots.
    pub fn available_balance(&self, account_id: i64) -> Result<Amount> {
        let account = self
            .account(account_id)?
            .ok_or(PennyError::NotFound("account"))?;
        account.balance.checked_sub(self.pot_holdings(account_id)?)
    }
}
