//! Forecasting: expand standing orders into dated occurrences and project
//! daily account balances over a window.
//!
use std::collections::BTreeMap;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PennyError, Result};
use crate::model::{Recurrence, ScheduledTransaction};
use crate::money::Amount;
use crate::store::Store;

/// One projected occurrence of a standing order.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ForecastTransaction {
    pub date: NaiveDate,
    pub name: String,
    pub amount: Amount,
    pub source_account_id: i64,
    pub destination_account_id: i64,
}

/// Projected balance of one account on one day.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ForecastPoint {
    pub account_id: i64,
    pub account_name: String,
    pub date: NaiveDate,
    pub balance: Amount,
    pub is_external: bool,
    pub amount_in: Amount,
    pub amount_out: Amount,
}

/// Expand standing orders into occurrences within `[start, end]`.
///
/// Each schedule is clamped to its own start/end dates. `Once` fires on its
/// start date when in range. `Custom` rules are not expanded.
pub fn expand_scheduled(
    scheduled: &[ScheduledTransaction],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<ForecastTransaction> {
    let mut forecast = Vec::new();

    for item in scheduled {
        if !item.is_active {
            continue;
        }
        let rule_start = item.start_date.max(start);
        let rule_end = item.end_date.unwrap_or(end).min(end);
        if rule_start > rule_end {
            continue;
        }

        let mut push = |date: NaiveDate| {
            forecast.push(ForecastTransaction {
                date,
                name: item.description.clone(),
                amount: item.amount,
                source_account_id: item.from_account_id,
                destination_account_id: item.to_account_id,
            })
        };

        match item.recurrence {
            Recurrence::Once => {
                if item.start_date >= rule_start && item.start_date <= rule_end {
                    push(item.start_date);
                }
            }
            Recurrence::Daily => {
                let mut day = rule_start;
                while day <= rule_end {
                    push(day);
                    let Some(next) = day.checked_add_days(Days::new(1)) else {
                        break;
                    };
                    day = next;
                }
            }
            Recurrence::Weekly => {
                let mut day = rule_start;
                while day <= rule_end {
                    push(day);
                    let Some(next) = day.checked_add_days(Days::new(7)) else {
                        break;
                    };
                    day = next;
                }
            }
            Recurrence::Monthly => {
                let mut months = 0u32;
                loop {
                    let Some(day) = rule_start.checked_add_months(Months::new(months)) else {
                        break;
                    };
                    if day > rule_end {
                        break;
                    }
                    push(day);
                    months += 1;
                }
            }
            // "2nd monday" style rules are stored but not expanded.
            Recurrence::Custom => {}
        }
    }

    forecast
}

impl Store {
    /// Occurrences of all active standing orders within `[start, end]`.
    pub fn forecast(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ForecastTransaction>> {
        if end < start {
            return Err(PennyError::invalid("end_date before start_date"));
        }
        Ok(expand_scheduled(&self.active_scheduled()?, start, end))
    }

    /// Daily balance projection per account over `[start, end]`.
    ///
    /// Starts from current balances and walks forward applying forecast
    /// occurrences, recording balance plus in/out movement for every day.
    pub fn forecast_balances(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ForecastPoint>> {
        let forecast = self.forecast(start, end)?;
        let accounts = self.list_accounts()?;

        let mut by_date: BTreeMap<NaiveDate, Vec<&ForecastTransaction>> = BTreeMap::new();
        for tx in &forecast {
            by_date.entry(tx.date).or_default().push(tx);
        }

        let mut running: BTreeMap<i64, i64> =
            accounts.iter().map(|a| (a.id, a.balance.minor())).collect();
        let mut points = Vec::new();

        let mut day = start;
        while day <= end {
            let mut moved_in: BTreeMap<i64, i64> = BTreeMap::new();
            let mut moved_out: BTreeMap<i64, i64> = BTreeMap::new();
            if let Some(txs) = by_date.get(&day) {
                for tx in txs {
                    let amount = tx.amount.minor();
                    if let Some(bal) = running.get_mut(&tx.source_account_id) {
                        *bal -= amount;
                    }
                    if let Some(bal) = running.get_mut(&tx.destination_account_id) {
                        *bal += amount;
                    }
                    *moved_out.entry(tx.source_account_id).or_default() += amount;
                    *moved_in.entry(tx.destination_account_id).or_default() += amount;
                }
            }
            for account in &accounts {
                points.push(ForecastPoint {
                    account_id: account.id,
                    account_name: account.name.clone(),
                    date: day,
                    balance: Amount(running[&account.id]),
                    is_external: account.is_external,
                    amount_in: Amount(moved_in.get(&account.id).copied().unwrap_or(0)),
                    amount_out: Amount(moved_out.get(&account.id).copied().unwrap_or(0)),
                });
            }
            let Some(next) = day.checked_add_days(Days::new(1)) else {
                break;
            };
            day = next;
        }

        Ok(points)
    }
}
