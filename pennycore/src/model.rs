//! Domain model for the pennywise ledger.
//!
//! These structs are serialized over the HTTP API and persisted by the
//! `store` module. Enums carry a stable lowercase string form which is the
//! value stored in SQLite and accepted in JSON.
//!
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{PennyError, Result};
use crate::money::Amount;

/// Kind of account held in the ledger.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Current,
    Savings,
    CreditCard,
    Loan,
    Mortgage,
    Crypto,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Current => "current",
            AccountType::Savings => "savings",
            AccountType::CreditCard => "credit_card",
            AccountType::Loan => "loan",
            AccountType::Mortgage => "mortgage",
            AccountType::Crypto => "crypto",
        }
    }

    pub fn parse(s: &str) -> Result<AccountType> {
        match s {
            "current" => Ok(AccountType::Current),
            "savings" => Ok(AccountType::Savings),
            "credit_card" => Ok(AccountType::CreditCard),
            "loan" => Ok(AccountType::Loan),
            "mortgage" => Ok(AccountType::Mortgage),
            "crypto" => Ok(AccountType::Crypto),
            other => Err(PennyError::invalid(format!("unknown account type: {other}"))),
        }
    }
}

/// Fiat or crypto currency.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyKind {
    Fiat,
    Crypto,
}

impl CurrencyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CurrencyKind::Fiat => "fiat",
            CurrencyKind::Crypto => "crypto",
        }
    }

    pub fn parse(s: &str) -> Result<CurrencyKind> {
        match s {
            "fiat" => Ok(CurrencyKind::Fiat),
            "crypto" => Ok(CurrencyKind::Crypto),
            other => Err(PennyError::invalid(format!("unknown currency kind: {other}"))),
        }
    }

    /// Decimals used when a currency is registered without an explicit value.
    pub fn default_decimals(self) -> u32 {
        match self {
            CurrencyKind::Fiat => 2,
            CurrencyKind::Crypto => 8,
        }
    }
}

/// A registered currency (e.g. "USD", "BTC").
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Currency {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub kind: CurrencyKind,
    pub decimals: u32,
    pub is_active: bool,
}

/// Exchange rate between two currencies at a point in time.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExchangeRate {
    pub id: i64,
    pub from_currency_id: i64,
    pub to_currency_id: i64,
    pub rate: f64,
    pub timestamp: NaiveDateTime,
}

/// A ledger account. `balance` is in minor units of `currency_id`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub account_type: AccountType,
    pub currency_id: i64,
    pub balance: Amount,
    /// External accounts model counterparties (employer, landlord...).
    pub is_external: bool,
    /// Annual rate, e.g. 0.075 for 7.5%.
    pub interest_rate: Option<f64>,
    /// "daily" or "monthly".
    pub interest_compounding: Option<String>,
    pub minimum_payment: Option<Amount>,
    /// How far below zero a current account may go.
    pub overdraft_limit: Option<Amount>,
    pub overdraft_interest_rate: Option<f64>,
}

/// A savings pot ring-fenced inside an account.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Pot {
    pub id: i64,
    pub name: String,
    pub target_amount: Amount,
    pub current_amount: Amount,
    pub is_active: bool,
    pub account_id: i64,
}

/// Spending category; categories form a tree via `parent_id`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
}

/// A category with its children resolved, for hierarchy listings.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CategoryNode {
    pub id: i64,
    pub name: String,
    pub children: Vec<CategoryNode>,
}

/// A booked transaction. The money movement lives in its legs.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Transaction {
    pub id: i64,
    pub description: String,
    pub date: NaiveDate,
}

/// One side of a double-entry booking.
///
/// Exactly one of `debit`/`credit` is set and positive. If `pot_id` is set
/// the pot belongs to `account_id`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TransactionLeg {
    pub id: i64,
    pub transaction_id: i64,
    pub account_id: i64,
    pub pot_id: Option<i64>,
    pub debit: Option<Amount>,
    pub credit: Option<Amount>,
}

impl TransactionLeg {
    /// Signed movement for the account: credits positive, debits negative.
    pub fn signed_amount(&self) -> Amount {
        match (self.debit, self.credit) {
            (Some(d), None) => -d,
            (None, Some(c)) => c,
            _ => Amount::ZERO,
        }
    }
}

/// How often a scheduled transaction fires.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Once,
    Daily,
    Weekly,
    Monthly,
    /// Complex patterns like "2nd monday"; carried but not expanded.
    Custom,
}

impl Recurrence {
    pub fn as_str(self) -> &'static str {
        match self {
            Recurrence::Once => "once",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Result<Recurrence> {
        match s {
            "once" => Ok(Recurrence::Once),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            "custom" => Ok(Recurrence::Custom),
            other => Err(PennyError::invalid(format!("unknown recurrence: {other}"))),
        }
    }
}

/// A standing order between two accounts (optionally between pots).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScheduledTransaction {
    pub id: i64,
    pub description: String,
    pub amount: Amount,
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub from_pot_id: Option<i64>,
    pub to_pot_id: Option<i64>,
    pub recurrence: Recurrence,
    pub custom_rule: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub shift_for_holidays: bool,
    pub is_active: bool,
}

/// A what-if scenario: a named bundle of hypothetical transactions kept
/// apart from the real ledger.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Scenario {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// One hypothetical transaction inside a scenario.
///
/// Positive amounts are inflows, negative amounts outflows.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScenarioTransaction {
    pub id: i64,
    pub scenario_id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Amount,
}

/// A registered user. Only the salted hash of the password is kept.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Column mapping for one bank's CSV statement layout.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImportFormat {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub date_column: String,
    pub amount_column: String,
    pub description_column: String,
    #[serde(default)]
    pub type_column: Option<String>,
    #[serde(default)]
    pub balance_column: Option<String>,
    #[serde(default)]
    pub reference_column: Option<String>,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,
    #[serde(default)]
    pub currency_symbol: String,
    /// Statement file encoding. Only UTF-8 variants are honored; the
    /// `-sig` one means a leading byte-order mark is stripped.
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Account this format is the default for, if any.
    #[serde(default)]
    pub account_id: Option<i64>,
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_thousands_separator() -> String {
    ",".to_string()
}

fn default_decimal_separator() -> String {
    ".".to_string()
}

fn default_encoding() -> String {
    "utf-8-sig".to_string()
}

/// One row parsed out of a bank statement.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImportedTransaction {
    pub date: NaiveDate,
    pub amount: Amount,
    pub description: String,
    pub tx_type: Option<String>,
    pub reference: Option<String>,
    /// Running balance if the statement provides one.
    pub balance: Option<Amount>,
    /// Original description before any cleaning.
    pub raw_description: String,
}

/// A parsed bank statement.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Statement {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_balance: Option<Amount>,
    pub end_balance: Option<Amount>,
    pub transactions: Vec<ImportedTransaction>,
}

impl Statement {
    pub fn total_credits(&self) -> Amount {
        Amount(
            self.transactions
                .iter()
                .filter(|tx| tx.amount.is_positive())
                .map(|tx| tx.amount.minor())
                .sum(),
        )
    }

    pub fn total_debits(&self) -> Amount {
        Amount(
            self.transactions
                .iter()
                .filter(|tx| tx.amount.is_negative())
                .map(|tx| tx.amount.minor())
                .sum(),
        )
    }

    /// Debits are negative, so the net movement is a plain sum.
    pub fn net_movement(&self) -> Amount {
        Amount(self.transactions.iter().map(|tx| tx.amount.minor()).sum())
    }
}
