//! Command implementations
//!
pub mod accounts;
pub mod currencies;
pub mod formats;
pub mod imports;
pub mod reconcile;
pub mod transactions;

use pennycore::model::{Account, Currency};
use pennycore::{Amount, PennyError, Result, Store};

/// Look up an account together with its currency.
pub(crate) fn account_with_currency(db: &Store, account_id: i64) -> Result<(Account, Currency)> {
    let account = db
        .account(account_id)?
        .ok_or(PennyError::NotFound("account"))?;
    let currency = db
        .currency_by_id(account.currency_id)?
        .ok_or(PennyError::NotFound("currency"))?;
    Ok((account, currency))
}

/// Parse a user-supplied amount in the minor units of the account's currency.
pub(crate) fn parse_account_amount(db: &Store, account_id: i64, raw: &str) -> Result<Amount> {
    let (_, currency) = account_with_currency(db, account_id)?;
    Amount::parse(raw, currency.decimals)
}
