//! Standing orders (scheduled transactions).
//!
use rusqlite::{OptionalExtension, params};

use crate::error::{PennyError, Result};
use crate::model::ScheduledTransaction;
use crate::store::{Store, scheduled_from_row};

/// Fields accepted when creating a standing order. The `id` on the input is
/// ignored; the stored row is returned with its assigned id.
pub type NewScheduled = ScheduledTransaction;

impl Store {
    pub fn create_scheduled(&self, new: NewScheduled) -> Result<ScheduledTransaction> {
        for account_id in [new.from_account_id, new.to_account_id] {
            if self.account(account_id)?.is_none() {
                return Err(PennyError::NotFound("account"));
            }
        }
        for pot_id in [new.from_pot_id, new.to_pot_id].into_iter().flatten() {
            if self.pot(pot_id)?.is_none() {
                return Err(PennyError::NotFound("pot"));
            }
        }
        if let Some(end) = new.end_date {
            if end < new.start_date {
                return Err(PennyError::invalid("end_date before start_date"));
            }
        }
        self.conn.execute(
            "INSERT INTO scheduled_transactions
               (description, amount, from_account_id, to_account_id, from_pot_id, to_pot_id,
                recurrence, custom_rule, start_date, end_date, shift_for_holidays, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                new.description,
                new.amount.minor(),
                new.from_account_id,
                new.to_account_id,
                new.from_pot_id,
                new.to_pot_id,
                new.recurrence.as_str(),
                new.custom_rule,
                new.start_date,
                new.end_date,
                new.shift_for_holidays,
                new.is_active,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.scheduled(id)?
            .ok_or(PennyError::NotFound("scheduled transaction"))
    }

    pub fn scheduled(&self, id: i64) -> Result<Option<ScheduledTransaction>> {
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM scheduled_transactions WHERE id = ?1",
                params![id],
                scheduled_from_row,
            )
            .optional()?)
    }

    pub fn list_scheduled(&self) -> Result<Vec<ScheduledTransaction>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM scheduled_transactions ORDER BY id")?;
        let rows = stmt.query_map([], scheduled_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Active standing orders only, for forecasting.
    pub fn active_scheduled(&self) -> Result<Vec<ScheduledTransaction>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM scheduled_transactions WHERE is_active = 1 ORDER BY id")?;
        let rows = stmt.query_map([], scheduled_from_row)?;
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
    use crate::model::{AccountType, CurrencyKind, Recurrence};
    use crate::money::Amount;
    use chrono::NaiveDate;

    fn template(from: i64, to: i64) -> NewScheduled {
        ScheduledTransaction {
            id: 0,
            description: "Rent".to_string(),
            amount: Amount(80_000),
            from_account_id: from,
            to_account_id: to,
            from_pot_id: None,
            to_pot_id: None,
            recurrence: Recurrence::Monthly,
            custom_rule: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            shift_for_holidays: true,
            is_active: true,
        }
    }

    #[test]
    fn create_and_list() {
        let store = Store::open_in_memory().unwrap();
        let gbp = store
            .create_currency("GBP", "British Pound", "£", CurrencyKind::Fiat, None)
            .unwrap();
        let a = store
            .create_account(NewAccount::new("Main", AccountType::Current, gbp.id))
            .unwrap();
        let b = store
            .create_account(
                NewAccount::new("Landlord", AccountType::Current, gbp.id).external(),
            )
            .unwrap();

        let created = store.create_scheduled(template(a.id, b.id)).unwrap();
        assert!(created.id > 0);
        assert_eq!(created.recurrence, Recurrence::Monthly);

        assert_eq!(store.list_scheduled().unwrap().len(), 1);
        assert!(store.scheduled(created.id).unwrap().is_some());
        assert!(store.scheduled(created.id + 1).unwrap().is_none());
    }

    #[test]
    fn unknown_account_rejected() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.create_scheduled(template(1, 2)).is_err());
    }

    #[test]
    fn inactive_excluded_from_active_listing() {
        let store = Store::open_in_memory().unwrap();
        let gbp = store
            .create_currency("GBP", "British Pound", "£", CurrencyKind::Fiat, None)
            .unwrap();
        let a = store
            .create_account(NewAccount::new("Main", AccountType::Current, gbp.id))
            .unwrap();
        let b = store
            .create_account(NewAccount::new("Other", AccountType::Current, gbp.id))
            .unwrap();
        let mut paused = template(a.id, b.id);
        paused.is_active = false;
        store.create_scheduled(paused).unwrap();
        store.create_scheduled(template(a.id, b.id)).unwrap();

        assert_eq!(store.list_scheduled().unwrap().len(), 2);
        assert_eq!(store.active_scheduled().unwrap().len(), 1);
    }
}
