//! Bank statement import: configurable CSV formats and the importer itself.
//!
//! An [`ImportFormat`] names the columns of one bank's CSV layout plus its
//! date format and number separators. Formats live in the database and can
//! be attached to an account as its default, or exchanged as JSON files.
//!
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use rusqlite::{OptionalExtension, params};

use crate::error::{PennyError, Result};
use crate::model::{ImportFormat, ImportedTransaction, Statement};
use crate::money::Amount;
use crate::store::{Store, format_from_row};

/// Parse a statement CSV file according to `fmt`.
///
/// Rows that fail to parse are logged and skipped; a file yielding no valid
/// rows is an error. `decimals` is the minor-unit scale of the target
/// account's currency.
pub fn import_csv(path: &Path, fmt: &ImportFormat, decimals: u32) -> Result<Statement> {
    if !path.exists() {
        return Err(PennyError::invalid(format!(
            "file not found: {}",
            path.display()
        )));
    }
    if path.extension().and_then(|e| e.to_str()).map(str::to_lowercase) != Some("csv".to_string()) {
        return Err(PennyError::invalid(format!(
            "unsupported file type: {}",
            path.display()
        )));
    }

    let encoding = fmt.encoding.to_lowercase();
    if !matches!(encoding.as_str(), "utf-8" | "utf8" | "utf-8-sig" | "ascii") {
        return Err(PennyError::invalid(format!(
            "unsupported statement encoding: {}",
            fmt.encoding
        )));
    }
    // With utf-8-sig the first header carries a byte-order mark.
    let strip_bom = encoding == "utf-8-sig";
    fn clean(h: &str, strip_bom: bool) -> &str {
        if strip_bom {
            h.trim_start_matches('\u{feff}').trim()
        } else {
            h.trim()
        }
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| clean(h, strip_bom) == name)
            .ok_or_else(|| PennyError::invalid(format!("column not found in file: {name}")))
    };
    let date_col = column(&fmt.date_column)?;
    let amount_col = column(&fmt.amount_column)?;
    let description_col = column(&fmt.description_column)?;
    let optional_column = |name: &Option<String>| -> Option<usize> {
        name.as_deref()
            .and_then(|n| headers.iter().position(|h| clean(h, strip_bom) == n))
    };
    let type_col = optional_column(&fmt.type_column);
    let balance_col = optional_column(&fmt.balance_column);
    let reference_col = optional_column(&fmt.reference_column);

    let mut transactions = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        match parse_row(
            &record,
            fmt,
            decimals,
            date_col,
            amount_col,
            description_col,
            type_col,
            balance_col,
            reference_col,
        ) {
            Ok(tx) => transactions.push(tx),
            Err(err) => {
                tracing::warn!(row = idx + 1, %err, "skipping unparseable statement row");
            }
        }
    }

    if transactions.is_empty() {
        return Err(PennyError::invalid(
            "no valid transactions found in file",
        ));
    }

    let start_date = transactions.iter().map(|tx| tx.date).min().unwrap_or_default();
    let end_date = transactions.iter().map(|tx| tx.date).max().unwrap_or_default();
    let start_balance = transactions.iter().find_map(|tx| tx.balance);
    let end_balance = transactions.iter().rev().find_map(|tx| tx.balance);

    Ok(Statement {
        start_date,
        end_date,
        start_balance,
        end_balance,
        transactions,
    })
}

fn parse_date(raw: &str, format: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), format) {
        return Ok(date);
    }
    // Formats carrying a time component parse as a datetime.
    NaiveDateTime::parse_from_str(raw.trim(), format)
        .map(|dt| dt.date())
        .map_err(|_| PennyError::invalid(format!("could not parse date: {raw}")))
}

#[allow(clippy::too_many_arguments)]
fn parse_row(
    record: &StringRecord,
    fmt: &ImportFormat,
    decimals: u32,
    date_col: usize,
    amount_col: usize,
    description_col: usize,
    type_col: Option<usize>,
    balance_col: Option<usize>,
    reference_col: Option<usize>,
) -> Result<ImportedTransaction> {
    let field = |idx: usize| -> Result<&str> {
        record
            .get(idx)
            .ok_or_else(|| PennyError::invalid("short row"))
    };
    let date = parse_date(field(date_col)?, &fmt.date_format)?;
    let amount = Amount::parse_statement(
        field(amount_col)?,
        &fmt.currency_symbol,
        &fmt.thousands_separator,
        &fmt.decimal_separator,
        decimals,
    )?;
    let raw_description = field(description_col)?.to_string();
    let optional = |idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let balance = match optional(balance_col) {
        Some(raw) => Some(Amount::parse_statement(
            &raw,
            &fmt.currency_symbol,
            &fmt.thousands_separator,
            &fmt.decimal_separator,
            decimals,
        )?),
        None => None,
    };

    Ok(ImportedTransaction {
        date,
        amount,
        description: raw_description.trim().to_string(),
        tx_type: optional(type_col),
        reference: optional(reference_col),
        balance,
        raw_description,
    })
}

impl Store {
    /// Register an import format. Names are unique.
    pub fn create_import_format(&self, fmt: &ImportFormat) -> Result<ImportFormat> {
        if self.import_format_by_name(&fmt.name)?.is_some() {
            return Err(PennyError::Conflict(format!(
                "import format {} already exists",
                fmt.name
            )));
        }
        self.conn.execute(
            "INSERT INTO import_formats
               (name, date_column, amount_column, description_column, type_column,
                balance_column, reference_column, date_format, thousands_separator,
                decimal_separator, currency_symbol, encoding, notes, account_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                fmt.name,
                fmt.date_column,
                fmt.amount_column,
                fmt.description_column,
                fmt.type_column,
                fmt.balance_column,
                fmt.reference_column,
                fmt.date_format,
                fmt.thousands_separator,
                fmt.decimal_separator,
                fmt.currency_symbol,
                fmt.encoding,
                fmt.notes,
                fmt.account_id,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.import_format(id)?
            .ok_or(PennyError::NotFound("import format"))
    }

    pub fn import_format(&self, id: i64) -> Result<Option<ImportFormat>> {
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM import_formats WHERE id = ?1",
                params![id],
                format_from_row,
            )
            .optional()?)
    }

    pub fn import_format_by_name(&self, name: &str) -> Result<Option<ImportFormat>> {
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM import_formats WHERE name = ?1",
                params![name],
                format_from_row,
            )
            .optional()?)
    }

    pub fn import_format_by_account(&self, account_id: i64) -> Result<Option<ImportFormat>> {
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM import_formats WHERE account_id = ?1",
                params![account_id],
                format_from_row,
            )
            .optional()?)
    }

    pub fn list_import_formats(&self) -> Result<Vec<ImportFormat>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM import_formats ORDER BY name")?;
        let rows = stmt.query_map([], format_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Make `format_id` the default format for `account_id`, clearing any
    /// previous default.
    pub fn set_account_format(&mut self, account_id: i64, format_id: i64) -> Result<()> {
        if self.account(account_id)?.is_none() {
            return Err(PennyError::NotFound("account"));
        }
        if self.import_format(format_id)?.is_none() {
            return Err(PennyError::NotFound("import format"));
        }
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE import_formats SET account_id = NULL WHERE account_id = ?1",
            params![account_id],
        )?;
        tx.execute(
            "UPDATE import_formats SET account_id = ?1 WHERE id = ?2",
            params![account_id, format_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Resolve a format by explicit name, falling back to the account's
    /// default.
    pub fn resolve_import_format(
        &self,
        name: Option<&str>,
        account_id: Option<i64>,
    ) -> Result<ImportFormat> {
        if let Some(name) = name {
            return self
                .import_format_by_name(name)?
                .ok_or(PennyError::NotFound("import format"));
        }
        if let Some(account_id) = account_id {
            if let Some(fmt) = self.import_format_by_account(account_id)? {
                return Ok(fmt);
            }
        }
        Err(PennyError::invalid(
            "import format must be provided if not stored with account",
        ))
    }

    /// Write a format definition to a JSON file.
    pub fn export_format_json(&self, format_id: i64, path: &Path) -> Result<()> {
        let fmt = self
            .import_format(format_id)?
            .ok_or(PennyError::NotFound("import format"))?;
        fs::write(path, serde_json::to_string_pretty(&fmt)?)?;
        Ok(())
    }

    /// Register a format from a JSON file.
    pub fn import_format_json(&self, path: &Path) -> Result<ImportFormat> {
        let data = fs::read_to_string(path)?;
        let fmt: ImportFormat = serde_json::from_str(&data)?;
        self.create_import_format(&fmt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn starling_format() -> ImportFormat {
        ImportFormat {
            id: 0,
            name: "Starling GBP".to_string(),
            date_column: "Date".to_string(),
            amount_column: "Amount (GBP)".to_string(),
            description_column: "Counter Party".to_string(),
            type_column: Some("Reference".to_string()),
            balance_column: Some("Balance (GBP)".to_string()),
            reference_column: None,
            date_format: "%d/%m/%Y".to_string(),
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            currency_symbol: "£".to_string(),
            encoding: "utf-8-sig".to_string(),
            notes: None,
            account_id: None,
        }
    }

    #[test]
    fn import_parses_statement() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "Date,Counter Party,Reference,Amount (GBP),Balance (GBP)").unwrap();
        writeln!(file, "01/03/2024,ACME Payroll,SALARY,\"2,000.00\",\"2,500.00\"").unwrap();
        writeln!(file, "not-a-date,Broken,X,1.00,1.00").unwrap();
        writeln!(file, "05/03/2024,Grocer,POS,-54.20,\"2,445.80\"").unwrap();
        drop(file);

        let stmt = import_csv(&path, &starling_format(), 2).unwrap();
        // The malformed row is skipped, not fatal.
        assert_eq!(stmt.transactions.len(), 2);
        assert_eq!(stmt.start_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(stmt.end_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(stmt.start_balance, Some(Amount(250_000)));
        assert_eq!(stmt.end_balance, Some(Amount(244_580)));
        assert_eq!(stmt.total_credits(), Amount(200_000));
        assert_eq!(stmt.total_debits(), Amount(-5_420));
        assert_eq!(stmt.transactions[0].tx_type.as_deref(), Some("SALARY"));
    }

    #[test]
    fn import_rejects_empty_and_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.csv");
        fs::write(&path, "Wrong,Headers\n1,2\n").unwrap();
        assert!(import_csv(&path, &starling_format(), 2).is_err());

        let missing = dir.path().join("missing.csv");
        assert!(import_csv(&missing, &starling_format(), 2).is_err());

        let txt = dir.path().join("statement.txt");
        fs::write(&txt, "hi").unwrap();
        assert!(import_csv(&txt, &starling_format(), 2).is_err());
    }

    #[test]
    fn import_honors_declared_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.csv");
        let mut data = Vec::new();
        // utf-8-sig statements open with a byte-order mark.
        data.extend_from_slice("\u{feff}".as_bytes());
        data.extend_from_slice(
            b"Date,Counter Party,Reference,Amount (GBP),Balance (GBP)\n\
              01/03/2024,ACME Payroll,SALARY,100.00,100.00\n",
        );
        fs::write(&path, &data).unwrap();

        let stmt = import_csv(&path, &starling_format(), 2).unwrap();
        assert_eq!(stmt.transactions.len(), 1);
        assert_eq!(stmt.transactions[0].amount, Amount(10_000));

        let mut latin = starling_format();
        latin.encoding = "latin-1".to_string();
        let err = import_csv(&path, &latin, 2).unwrap_err();
        assert!(matches!(err, PennyError::Invalid(_)));
    }

    #[test]
    fn format_registry_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let created = store.create_import_format(&starling_format()).unwrap();
        assert!(created.id > 0);

        assert!(store.import_format_by_name("Starling GBP").unwrap().is_some());
        assert!(store.create_import_format(&starling_format()).is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fmt.json");
        store.export_format_json(created.id, &path).unwrap();

        let other = Store::open_in_memory().unwrap();
        let imported = other.import_format_json(&path).unwrap();
        assert_eq!(imported.name, "Starling GBP");
        assert_eq!(imported.date_format, "%d/%m/%Y");
    }

    #[test]
    fn account_default_format_moves() {
        use crate::accounts::NewAccount;
        use crate::model::{AccountType, CurrencyKind};

        let mut store = Store::open_in_memory().unwrap();
        let gbp = store
            .create_currency("GBP", "British Pound", "£", CurrencyKind::Fiat, None)
            .unwrap();
        let acc = store
            .create_account(NewAccount::new("Main", AccountType::Current, gbp.id))
            .unwrap();
        let fmt_a = store.create_import_format(&starling_format()).unwrap();
        let mut other = starling_format();
        other.name = "Monzo".to_string();
        let fmt_b = store.create_import_format(&other).unwrap();

        store.set_account_format(acc.id, fmt_a.id).unwrap();
        assert_eq!(
            store.import_format_by_account(acc.id).unwrap().unwrap().id,
            fmt_a.id
        );

        // Reassigning replaces the default rather than violating the unique
        // account constraint.
        store.set_account_format(acc.id, fmt_b.id).unwrap();
        assert_eq!(
            store.import_format_by_account(acc.id).unwrap().unwrap().id,
            fmt_b.id
        );

        let resolved = store.resolve_import_format(None, Some(acc.id)).unwrap();
        assert_eq!(resolved.id, fmt_b.id);
        assert!(store.resolve_import_format(None, None).is_err());
    }
}
