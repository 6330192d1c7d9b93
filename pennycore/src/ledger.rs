//! Double-entry ledger operations.
//!
//! Every money movement books one transaction with two legs: a debit on the
//! paying side and a credit on the receiving side. Account balances are
//! updated in the same SQL transaction as the legs, so a crash can never
//! leave a half-booked transfer.
//!
use chrono::NaiveDate;
use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::error::{PennyError, Result};
use crate::model::{Account, AccountType, Transaction, TransactionLeg};
use crate::money::Amount;
use crate::store::{Store, leg_from_row, transaction_from_row};

/// Direction of a pot transfer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PotDirection {
    ToPot,
    FromPot,
}

/// Direction of a payment against an external account.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExternalDirection {
    In,
    Out,
}

/// A leg joined with its transaction, as returned by listings.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LedgerEntry {
    pub leg_id: i64,
    pub transaction_id: i64,
    pub account_id: i64,
    pub date: NaiveDate,
    pub description: String,
    /// Credits positive, debits negative.
    pub amount: Amount,
}

/// Lowest balance an account may reach through a debit.
fn floor_balance(account: &Account) -> i64 {
    if account.is_external {
        // Counterparty accounts absorb whatever we book against them.
        return i64::MIN;
    }
    match account.account_type {
        // Debt accounts live below zero by nature.
        AccountType::CreditCard | AccountType::Loan | AccountType::Mortgage => i64::MIN,
        AccountType::Current => -account.overdraft_limit.unwrap_or(Amount::ZERO).minor(),
        _ => 0,
    }
}

fn check_debit(account: &Account, amount: Amount) -> Result<()> {
    let after = account
        .balance
        .checked_sub(amount)?
        .minor();
    if after < floor_balance(account) {
        return Err(PennyError::invalid(format!(
            "insufficient funds in account {}",
            account.name
        )));
    }
    Ok(())
}

impl Store {
    /// Move money between two accounts as a two-leg transaction.
    pub fn transfer(
        &mut self,
        from_account_id: i64,
        to_account_id: i64,
        amount: Amount,
        description: Option<&str>,
        date: NaiveDate,
    ) -> Result<Transaction> {
        if from_account_id == to_account_id {
            return Err(PennyError::invalid(
                "from and to accounts cannot be the same",
            ));
        }
        if !amount.is_positive() {
            return Err(PennyError::invalid("transfer amount must be positive"));
        }
        let from = self
            .account(from_account_id)?
            .ok_or(PennyError::NotFound("account"))?;
        let to = self
            .account(to_account_id)?
            .ok_or(PennyError::NotFound("account"))?;
        if from.currency_id != to.currency_id {
            return Err(PennyError::invalid(
                "transfer accounts must share a currency",
            ));
        }
        check_debit(&from, amount)?;

        let description = description
            .map(str::to_string)
            .unwrap_or_else(|| format!("Transfer from {} to {}", from.name, to.name));

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO transactions (description, date) VALUES (?1, ?2)",
            params![description, date],
        )?;
        let txn_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO transaction_legs (transaction_id, account_id, debit) VALUES (?1, ?2, ?3)",
            params![txn_id, from.id, amount.minor()],
        )?;
        tx.execute(
            "INSERT INTO transaction_legs (transaction_id, account_id, credit) VALUES (?1, ?2, ?3)",
            params![txn_id, to.id, amount.minor()],
        )?;
        tx.execute(
            "UPDATE accounts SET balance = balance - ?1 WHERE id = ?2",
            params![amount.minor(), from.id],
        )?;
        tx.execute(
            "UPDATE accounts SET balance = balance + ?1 WHERE id = ?2",
            params![amount.minor(), to.id],
        )?;
        tx.commit()?;

        Ok(Transaction {
            id: txn_id,
            description,
            date,
        })
    }

    /// Move money between an account's free balance and one of its pots.
    ///
    /// The account balance is untouched; pots ring-fence part of it. Both
    /// legs sit on the account, the pot side carrying the `pot_id`.
    pub fn pot_transfer(
        &mut self,
        account_id: i64,
        pot_id: i64,
        direction: PotDirection,
        amount: Amount,
        date: NaiveDate,
    ) -> Result<Transaction> {
        if !amount.is_positive() {
            return Err(PennyError::invalid("transfer amount must be positive"));
        }
        let account = self
            .account(account_id)?
            .ok_or(PennyError::NotFound("account"))?;
        let pot = self.pot(pot_id)?.ok_or(PennyError::NotFound("pot"))?;
        if pot.account_id != account.id {
            return Err(PennyError::invalid(
                "pot does not belong to specified account",
            ));
        }
        match direction {
            PotDirection::ToPot => {
                if amount > self.available_balance(account.id)? {
                    return Err(PennyError::invalid("insufficient free balance"));
                }
            }
            PotDirection::FromPot => {
                if amount > pot.current_amount {
                    return Err(PennyError::invalid("insufficient funds in pot"));
                }
            }
        }

        let description = format!(
            "Pot transfer {}",
            match direction {
                PotDirection::ToPot => "to_pot",
                PotDirection::FromPot => "from_pot",
            }
        );

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO transactions (description, date) VALUES (?1, ?2)",
            params![description, date],
        )?;
        let txn_id = tx.last_insert_rowid();
        let (delta, debit_pot) = match direction {
            PotDirection::ToPot => (amount.minor(), false),
            PotDirection::FromPot => (-amount.minor(), true),
        };
        if debit_pot {
            tx.execute(
                "INSERT INTO transaction_legs (transaction_id, account_id, pot_id, debit)
                 VALUES (?1, ?2, ?3, ?4)",
                params![txn_id, account.id, pot.id, amount.minor()],
            )?;
            tx.execute(
                "INSERT INTO transaction_legs (transaction_id, account_id, credit)
                 VALUES (?1, ?2, ?3)",
                params![txn_id, account.id, amount.minor()],
            )?;
        } else {
            tx.execute(
                "INSERT INTO transaction_legs (transaction_id, account_id, debit)
                 VALUES (?1, ?2, ?3)",
                params![txn_id, account.id, amount.minor()],
            )?;
            tx.execute(
                "INSERT INTO transaction_legs (transaction_id, account_id, pot_id, credit)
                 VALUES (?1, ?2, ?3, ?4)",
                params![txn_id, account.id, pot.id, amount.minor()],
            )?;
        }
        tx.execute(
            "UPDATE pots SET current_amount = current_amount + ?1 WHERE id = ?2",
            params![delta, pot.id],
        )?;
        tx.commit()?;

        Ok(Transaction {
            id: txn_id,
            description,
            date,
        })
    }

    /// Book a payment to or from an external counterparty account.
    pub fn external_payment(
        &mut self,
        internal_account_id: i64,
        external_account_id: i64,
        direction: ExternalDirection,
        amount: Amount,
        note: Option<&str>,
        date: NaiveDate,
    ) -> Result<Transaction> {
        if !amount.is_positive() {
            return Err(PennyError::invalid("payment amount must be positive"));
        }
        let internal = self
            .account(internal_account_id)?
            .ok_or(PennyError::NotFound("account"))?;
        let external = self
            .account(external_account_id)?
            .ok_or(PennyError::NotFound("external account"))?;
        if !external.is_external {
            return Err(PennyError::NotFound("external account"));
        }
        let (from, to) = match direction {
            ExternalDirection::Out => (&internal, &external),
            ExternalDirection::In => (&external, &internal),
        };
        check_debit(from, amount)?;

        let description = note.unwrap_or("External payment").to_string();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO transactions (description, date) VALUES (?1, ?2)",
            params![description, date],
        )?;
        let txn_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO transaction_legs (transaction_id, account_id, debit) VALUES (?1, ?2, ?3)",
            params![txn_id, from.id, amount.minor()],
        )?;
        tx.execute(
            "INSERT INTO transaction_legs (transaction_id, account_id, credit) VALUES (?1, ?2, ?3)",
            params![txn_id, to.id, amount.minor()],
        )?;
        tx.execute(
            "UPDATE accounts SET balance = balance - ?1 WHERE id = ?2",
            params![amount.minor(), from.id],
        )?;
        tx.execute(
            "UPDATE accounts SET balance = balance + ?1 WHERE id = ?2",
            params![amount.minor(), to.id],
        )?;
        tx.commit()?;

        Ok(Transaction {
            id: txn_id,
            description,
            date,
        })
    }

    pub fn transaction(&self, id: i64) -> Result<Option<Transaction>> {
        use rusqlite::OptionalExtension;
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM transactions WHERE id = ?1",
                params![id],
                transaction_from_row,
            )
            .optional()?)
    }

    pub fn legs_of_transaction(&self, transaction_id: i64) -> Result<Vec<TransactionLeg>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM transaction_legs WHERE transaction_id = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![transaction_id], leg_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Ledger entries touching an account, newest first, optionally bounded.
    pub fn account_entries(
        &self,
        account_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<LedgerEntry>> {
        let mut entries = self.entries_between(start, end)?;
        entries.retain(|e| e.account_id == account_id);
        Ok(entries)
    }

    /// All ledger entries in a date window, newest first.
    pub fn entries_between(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<LedgerEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.id AS leg_id, l.transaction_id, l.account_id, l.debit, l.credit,
                    t.date, t.description
             FROM transaction_legs l JOIN transactions t ON t.id = l.transaction_id
             WHERE (?1 IS NULL OR t.date >= ?1) AND (?2 IS NULL OR t.date <= ?2)
             ORDER BY t.date DESC, l.id DESC",
        )?;
        let rows = stmt.query_map(params![start, end], |row| {
            let debit: Option<i64> = row.get("debit")?;
            let credit: Option<i64> = row.get("credit")?;
            Ok(LedgerEntry {
                leg_id: row.get("leg_id")?,
                transaction_id: row.get("transaction_id")?,
                account_id: row.get("account_id")?,
                date: row.get("date")?,
                description: row.get("description")?,
                amount: Amount(credit.unwrap_or(0) - debit.unwrap_or(0)),
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::NewAccount;
    use crate::model::CurrencyKind;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture() -> (Store, i64, i64) {
        let store = Store::open_in_memory().unwrap();
        let gbp = store
            .create_currency("GBP", "British Pound", "£", CurrencyKind::Fiat, None)
            .unwrap();
        let a = store
            .create_account(
                NewAccount::new("Main", AccountType::Current, gbp.id)
                    .with_balance(Amount(10_000)),
            )
            .unwrap();
        let b = store
            .create_account(NewAccount::new("Savings", AccountType::Savings, gbp.id))
            .unwrap();
        (store, a.id, b.id)
    }

    #[test]
    fn transfer_books_two_legs_and_moves_balances() {
        let (mut store, a, b) = fixture();
        let txn = store
            .transfer(a, b, Amount(2_500), Some("monthly saving"), day(2024, 3, 1))
            .unwrap();

        let legs = store.legs_of_transaction(txn.id).unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].debit, Some(Amount(2_500)));
        assert_eq!(legs[1].credit, Some(Amount(2_500)));

        assert_eq!(store.account(a).unwrap().unwrap().balance, Amount(7_500));
        assert_eq!(store.account(b).unwrap().unwrap().balance, Amount(2_500));
    }

    #[test]
    fn transfer_rejects_same_account_and_overdrawn() {
        let (mut store, a, b) = fixture();
        assert!(store.transfer(a, a, Amount(100), None, day(2024, 3, 1)).is_err());
        // No overdraft configured: cannot go below zero.
        assert!(
            store
                .transfer(a, b, Amount(20_000), None, day(2024, 3, 1))
                .is_err()
        );
    }

    #[test]
    fn overdraft_limit_allows_bounded_negative_balance() {
        let store = Store::open_in_memory().unwrap();
        let gbp = store
            .create_currency("GBP", "British Pound", "£", CurrencyKind::Fiat, None)
            .unwrap();
        let mut new = NewAccount::new("Main", AccountType::Current, gbp.id);
        new.balance = Amount(1_000);
        new.overdraft_limit = Some(Amount(5_000));
        let mut store = store;
        let a = store.create_account(new).unwrap();
        let b = store
            .create_account(NewAccount::new("Other", AccountType::Savings, gbp.id))
            .unwrap();

        store.transfer(a.id, b.id, Amount(4_000), None, day(2024, 3, 1)).unwrap();
        assert_eq!(store.account(a.id).unwrap().unwrap().balance, Amount(-3_000));
        // One more step would breach the overdraft limit.
        assert!(
            store
                .transfer(a.id, b.id, Amount(3_000), None, day(2024, 3, 2))
                .is_err()
        );
    }

    #[test]
    fn pot_transfer_moves_ring_fence_not_balance() {
        let (mut store, a, _) = fixture();
        let pot = store
            .create_pot(a, "Holiday", Amount(50_000), Amount::ZERO)
            .unwrap();

        store
            .pot_transfer(a, pot.id, PotDirection::ToPot, Amount(3_000), day(2024, 3, 1))
            .unwrap();
        assert_eq!(
            store.pot(pot.id).unwrap().unwrap().current_amount,
            Amount(3_000)
        );
        assert_eq!(store.account(a).unwrap().unwrap().balance, Amount(10_000));
        assert_eq!(store.available_balance(a).unwrap(), Amount(7_000));

        store
            .pot_transfer(a, pot.id, PotDirection::FromPot, Amount(1_000), day(2024, 3, 2))
            .unwrap();
        assert_eq!(
            store.pot(pot.id).unwrap().unwrap().current_amount,
            Amount(2_000)
        );

        // Withdrawing more than the pot holds is rejected.
        assert!(
            store
                .pot_transfer(a, pot.id, PotDirection::FromPot, Amount(9_000), day(2024, 3, 3))
                .is_err()
        );
    }

    #[test]
    fn pot_must_belong_to_account() {
        let (mut store, a, b) = fixture();
        let pot = store.create_pot(a, "Holiday", Amount::ZERO, Amount::ZERO).unwrap();
        assert!(
            store
                .pot_transfer(b, pot.id, PotDirection::ToPot, Amount(100), day(2024, 3, 1))
                .is_err()
        );
    }

    #[test]
    fn external_payment_requires_external_flag() {
        let (mut store, a, b) = fixture();
        // `b` is an ordinary account, not a counterparty.
        assert!(
            store
                .external_payment(
                    a,
                    b,
                    ExternalDirection::Out,
                    Amount(100),
                    None,
                    day(2024, 3, 1)
                )
                .is_err()
        );
    }

    #[test]
    fn external_payment_in_and_out() {
        let (mut store, a, _) = fixture();
        let gbp = store.currency_by_code("GBP").unwrap().unwrap();
        let landlord = store
            .create_account(
                NewAccount::new("Landlord", AccountType::Current, gbp.id).external(),
            )
            .unwrap();

        store
            .external_payment(
                a,
                landlord.id,
                ExternalDirection::Out,
                Amount(8_000),
                Some("rent"),
                day(2024, 3, 1),
            )
            .unwrap();
        assert_eq!(store.account(a).unwrap().unwrap().balance, Amount(2_000));
        assert_eq!(
            store.account(landlord.id).unwrap().unwrap().balance,
            Amount(8_000)
        );

        store
            .external_payment(
                a,
                landlord.id,
                ExternalDirection::In,
                Amount(500),
                Some("deposit back"),
                day(2024, 3, 10),
            )
            .unwrap();
        assert_eq!(store.account(a).unwrap().unwrap().balance, Amount(2_500));

        let entries = store.account_entries(a, None, None).unwrap();
        assert_eq!(entries.len(), 2);
        // Newest first.
        assert_eq!(entries[0].amount, Amount(500));
        assert_eq!(entries[1].amount, Amount(-8_000));
    }
}
