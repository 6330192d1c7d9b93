//! Currency registry and exchange rates.
//!
//! Codes are stored uppercased and unique. Rates are directional snapshots;
//! lookups take the latest one at or before the requested time.
//!
use chrono::{NaiveDateTime, Utc};
use rusqlite::{OptionalExtension, params};

use crate::error::{PennyError, Result};
use crate::model::{Currency, CurrencyKind, ExchangeRate};
use crate::money::Amount;
use crate::store::{Store, currency_from_row};

/// Common fiat currencies seeded into a fresh database.
const SEED_FIAT: &[(&str, &str, &str, u32)] = &[
    ("USD", "US Dollar", "$", 2),
    ("GBP", "British Pound", "£", 2),
    ("EUR", "Euro", "€", 2),
    ("JPY", "Japanese Yen", "¥", 0),
    ("AUD", "Australian Dollar", "A$", 2),
    ("CAD", "Canadian Dollar", "C$", 2),
    ("CHF", "Swiss Franc", "Fr", 2),
    ("CNY", "Chinese Yuan", "¥", 2),
];

/// Common cryptocurrencies seeded into a fresh database.
const SEED_CRYPTO: &[(&str, &str, &str, u32)] = &[
    ("BTC", "Bitcoin", "₿", 8),
    ("ETH", "Ethereum", "Ξ", 18),
    ("USDT", "Tether", "₮", 6),
    ("SOL", "Solana", "SOL", 9),
    ("ADA", "Cardano", "ADA", 6),
    ("DOGE", "Dogecoin", "Ð", 8),
];

impl Store {
    /// Register a currency. Decimals default by kind (2 fiat, 8 crypto).
    pub fn create_currency(
        &self,
        code: &str,
        name: &str,
        symbol: &str,
        kind: CurrencyKind,
        decimals: Option<u32>,
    ) -> Result<Currency> {
        let code = code.to_uppercase();
        if self.currency_by_code(&code)?.is_some() {
            return Err(PennyError::Conflict(format!(
                "currency {code} already registered"
            )));
        }
        let decimals = decimals.unwrap_or_else(|| kind.default_decimals());
        self.conn.execute(
            "INSERT INTO currencies (code, name, symbol, kind, decimals, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)",
            params![code, name, symbol, kind.as_str(), decimals],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(Currency {
            id,
            code,
            name: name.to_string(),
            symbol: symbol.to_string(),
            kind,
            decimals,
            is_active: true,
        })
    }

    pub fn currency_by_id(&self, id: i64) -> Result<Option<Currency>> {
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM currencies WHERE id = ?1",
                params![id],
                currency_from_row,
            )
            .optional()?)
    }

    pub fn currency_by_code(&self, code: &str) -> Result<Option<Currency>> {
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM currencies WHERE code = ?1",
                params![code.to_uppercase()],
                currency_from_row,
            )
            .optional()?)
    }

    /// All active currencies, optionally filtered by kind.
    pub fn list_currencies(&self, kind: Option<CurrencyKind>) -> Result<Vec<Currency>> {
        let mut out = Vec::new();
        match kind {
            Some(kind) => {
                let mut stmt = self.conn.prepare(
                    "SELECT * FROM currencies WHERE is_active = 1 AND kind = ?1 ORDER BY code",
                )?;
                let rows = stmt.query_map(params![kind.as_str()], currency_from_row)?;
                for row in rows {
                    out.push(row?);
                }
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT * FROM currencies WHERE is_active = 1 ORDER BY code")?;
                let rows = stmt.query_map([], currency_from_row)?;
                for row in rows {
                    out.push(row?);
                }
            }
        }
        Ok(out)
    }

    /// Seed the registry with common fiat and crypto currencies, skipping any
    /// code already present.
    pub fn seed_currencies(&self) -> Result<()> {
        for (code, name, symbol, decimals) in SEED_FIAT {
            if self.currency_by_code(code)?.is_none() {
                self.create_currency(code, name, symbol, CurrencyKind::Fiat, Some(*decimals))?;
            }
        }
        for (code, name, symbol, decimals) in SEED_CRYPTO {
            if self.currency_by_code(code)?.is_none() {
                self.create_currency(code, name, symbol, CurrencyKind::Crypto, Some(*decimals))?;
            }
        }
        Ok(())
    }

    /// Record a directional exchange rate snapshot.
    pub fn set_exchange_rate(
        &self,
        from_code: &str,
        to_code: &str,
        rate: f64,
        timestamp: Option<NaiveDateTime>,
    ) -> Result<ExchangeRate> {
        let from = self
            .currency_by_code(from_code)?
            .ok_or(PennyError::NotFound("currency"))?;
        let to = self
            .currency_by_code(to_code)?
            .ok_or(PennyError::NotFound("currency"))?;
        if rate <= 0.0 {
            return Err(PennyError::invalid("exchange rate must be positive"));
        }
        let timestamp = timestamp.unwrap_or_else(|| Utc::now().naive_utc());
        self.conn.execute(
            "INSERT INTO exchange_rates (from_currency_id, to_currency_id, rate, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![from.id, to.id, rate, timestamp],
        )?;
        Ok(ExchangeRate {
            id: self.conn.last_insert_rowid(),
            from_currency_id: from.id,
            to_currency_id: to.id,
            rate,
            timestamp,
        })
    }

    /// Latest rate from one currency to another, optionally as of `at_time`.
    ///
    /// Identical currencies always convert at 1. Returns `None` when no
    /// snapshot exists.
    pub fn exchange_rate(
        &self,
        from_code: &str,
        to_code: &str,
        at_time: Option<NaiveDateTime>,
    ) -> Result<Option<f64>> {
        let from = self
            .currency_by_code(from_code)?
            .ok_or(PennyError::NotFound("currency"))?;
        let to = self
            .currency_by_code(to_code)?
            .ok_or(PennyError::NotFound("currency"))?;
        if from.id == to.id {
            return Ok(Some(1.0));
        }
        let rate = match at_time {
            Some(at) => self
                .conn
                .query_row(
                    "SELECT rate FROM exchange_rates
                     WHERE from_currency_id = ?1 AND to_currency_id = ?2 AND timestamp <= ?3
                     ORDER BY timestamp DESC LIMIT 1",
                    params![from.id, to.id, at],
                    |row| row.get(0),
                )
                .optional()?,
            None => self
                .conn
                .query_row(
                    "SELECT rate FROM exchange_rates
                     WHERE from_currency_id = ?1 AND to_currency_id = ?2
                     ORDER BY timestamp DESC LIMIT 1",
                    params![from.id, to.id],
                    |row| row.get(0),
                )
                .optional()?,
        };
        Ok(rate)
    }

    /// Convert an amount between currencies using the latest known rate.
    ///
    /// The result is rescaled from the source currency's decimals to the
    /// target's and rounded to the nearest minor unit.
    pub fn convert_amount(
        &self,
        amount: Amount,
        from_code: &str,
        to_code: &str,
        at_time: Option<NaiveDateTime>,
    ) -> Result<Option<Amount>> {
        let Some(rate) = self.exchange_rate(from_code, to_code, at_time)? else {
            return Ok(None);
        };
        let from = self
            .currency_by_code(from_code)?
            .ok_or(PennyError::NotFound("currency"))?;
        let to = self
            .currency_by_code(to_code)?
            .ok_or(PennyError::NotFound("currency"))?;
        let major = amount.minor() as f64 / 10f64.powi(from.decimals as i32);
        let converted = major * rate * 10f64.powi(to.decimals as i32);
        Ok(Some(Amount(converted.round() as i64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_lookup_currency() {
        let store = Store::open_in_memory().unwrap();
        let usd = store
            .create_currency("usd", "US Dollar", "$", CurrencyKind::Fiat, None)
            .unwrap();
        assert_eq!(usd.code, "USD");
        assert_eq!(usd.decimals, 2);

        let found = store.currency_by_code("USD").unwrap().unwrap();
        assert_eq!(found.id, usd.id);

        // Duplicate code is rejected regardless of case.
        assert!(
            store
                .create_currency("USD", "Dollar again", "$", CurrencyKind::Fiat, None)
                .is_err()
        );
    }

    #[test]
    fn crypto_defaults_to_eight_decimals() {
        let store = Store::open_in_memory().unwrap();
        let btc = store
            .create_currency("BTC", "Bitcoin", "₿", CurrencyKind::Crypto, None)
            .unwrap();
        assert_eq!(btc.decimals, 8);
    }

    #[test]
    fn seed_is_idempotent() {
        let store = Store::open_in_memory().unwrap();
        store.seed_currencies().unwrap();
        store.seed_currencies().unwrap();
        let all = store.list_currencies(None).unwrap();
        assert_eq!(all.len(), SEED_FIAT.len() + SEED_CRYPTO.len());
        let fiat = store.list_currencies(Some(CurrencyKind::Fiat)).unwrap();
        assert_eq!(fiat.len(), SEED_FIAT.len());
    }

    #[test]
    fn exchange_rates_pick_latest() {
        let store = Store::open_in_memory().unwrap();
        store.seed_currencies().unwrap();

        let t1 = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let t2 = chrono::NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        store.set_exchange_rate("GBP", "USD", 1.20, Some(t1)).unwrap();
        store.set_exchange_rate("GBP", "USD", 1.30, Some(t2)).unwrap();

        assert_eq!(store.exchange_rate("GBP", "USD", None).unwrap(), Some(1.30));
        // As-of lookup takes the snapshot at or before the requested time.
        assert_eq!(
            store.exchange_rate("GBP", "USD", Some(t1)).unwrap(),
            Some(1.20)
        );
        assert_eq!(store.exchange_rate("GBP", "GBP", None).unwrap(), Some(1.0));
        assert_eq!(store.exchange_rate("USD", "GBP", None).unwrap(), None);
    }

    #[test]
    fn convert_rescales_decimals() {
        let store = Store::open_in_memory().unwrap();
        store.seed_currencies().unwrap();
        store.set_exchange_rate("GBP", "JPY", 190.0, None).unwrap();

        // £10.00 -> ¥1900 (JPY has zero decimals).
        let out = store
            .convert_amount(Amount(1000), "GBP", "JPY", None)
            .unwrap()
            .unwrap();
        assert_eq!(out, Amount(1900));
    }
}
