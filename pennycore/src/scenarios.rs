//! What-if scenarios: hypothetical transactions projected as a running
//! balance, kept apart from the real ledger.
//!
use chrono::NaiveDate;
use rusqlite::{OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::error::{PennyError, Result};
use crate::model::{Scenario, ScenarioTransaction};
use crate::money::Amount;
use crate::store::{Store, scenario_from_row, scenario_transaction_from_row};

/// One step of a scenario projection: the transaction plus the balance
/// after applying it.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScenarioForecastPoint {
    pub date: NaiveDate,
    pub amount: Amount,
    pub balance: Amount,
    pub description: String,
}

impl Store {
    pub fn create_scenario(&self, name: &str, description: Option<&str>) -> Result<Scenario> {
        if name.trim().is_empty() {
            return Err(PennyError::invalid("scenario name must not be empty"));
        }
        self.conn.execute(
            "INSERT INTO scenarios (name, description) VALUES (?1, ?2)",
            params![name, description],
        )?;
        Ok(Scenario {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            description: description.map(str::to_string),
        })
    }

    pub fn scenario(&self, id: i64) -> Result<Option<Scenario>> {
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM scenarios WHERE id = ?1",
                params![id],
                scenario_from_row,
            )
            .optional()?)
    }

    pub fn list_scenarios(&self) -> Result<Vec<Scenario>> {
        let mut stmt = self.conn.prepare("SELECT * FROM scenarios ORDER BY id")?;
        let rows = stmt.query_map([], scenario_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Add a hypothetical transaction to a scenario. Positive amounts are
    /// inflows, negative amounts outflows.
    pub fn add_scenario_transaction(
        &self,
        scenario_id: i64,
        amount: Amount,
        description: &str,
        date: NaiveDate,
    ) -> Result<ScenarioTransaction> {
        if self.scenario(scenario_id)?.is_none() {
            return Err(PennyError::NotFound("scenario"));
        }
        self.conn.execute(
            "INSERT INTO scenario_transactions (scenario_id, date, description, amount)
             VALUES (?1, ?2, ?3, ?4)",
            params![scenario_id, date, description, amount.minor()],
        )?;
        Ok(ScenarioTransaction {
            id: self.conn.last_insert_rowid(),
            scenario_id,
            date,
            description: description.to_string(),
            amount,
        })
    }

    pub fn scenario_transactions(&self, scenario_id: i64) -> Result<Vec<ScenarioTransaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM scenario_transactions WHERE scenario_id = ?1 ORDER BY date, id",
        )?;
        let rows = stmt.query_map(params![scenario_id], scenario_transaction_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Running balance over a scenario's transactions up to `end_date`,
    /// starting from zero and walking them in date order.
    pub fn scenario_forecast(
        &self,
        scenario_id: i64,
        end_date: NaiveDate,
    ) -> Result<Vec<ScenarioForecastPoint>> {
        if self.scenario(scenario_id)?.is_none() {
            return Err(PennyError::NotFound("scenario"));
        }
        let mut balance = Amount::ZERO;
        let mut forecast = Vec::new();
        for tx in self.scenario_transactions(scenario_id)? {
            if tx.date > end_date {
                break;
            }
            balance = balance.checked_add(tx.amount)?;
            forecast.push(ScenarioForecastPoint {
                date: tx.date,
                amount: tx.amount,
                balance,
                description: tx.description,
            });
        }
        Ok(forecast)
    }
}
