//! Interest accrual for interest-bearing accounts and overdrafts.
//!
//! Rates are annual. Accrual compounds daily (rate/365) or monthly
//! (rate/12, applied over 30-day months) and returns the interest earned or
//! owed over `days`, rounded to the nearest minor unit.
//!
use crate::model::{Account, AccountType};
use crate::money::Amount;

/// Compounding cadence string stored on the account.
pub const COMPOUNDING_DAILY: &str = "daily";
pub const COMPOUNDING_MONTHLY: &str = "monthly";

/// Interest accrued on the account balance over `days`.
///
/// Zero when the account has no rate or no recognized compounding cadence.
pub fn accrue_interest(account: &Account, days: u32) -> Amount {
    let Some(rate) = account.interest_rate else {
        return Amount::ZERO;
    };
    let Some(compounding) = account.interest_compounding.as_deref() else {
        return Amount::ZERO;
    };
    let daily_rate = match compounding {
        COMPOUNDING_DAILY => rate / 365.0,
        COMPOUNDING_MONTHLY => rate / 12.0 / 30.0,
        _ => return Amount::ZERO,
    };
    let balance = account.balance.minor() as f64;
    let interest = balance * ((1.0 + daily_rate).powi(days as i32) - 1.0);
    Amount(interest.round() as i64)
}

/// Overdraft interest owed by a current account with a negative balance.
///
/// The charged amount is capped at the configured overdraft limit.
pub fn accrue_overdraft_interest(account: &Account, days: u32) -> Amount {
    if account.account_type != AccountType::Current {
        return Amount::ZERO;
    }
    if !account.balance.is_negative() {
        return Amount::ZERO;
    }
    let Some(rate) = account.overdraft_interest_rate else {
        return Amount::ZERO;
    };
    let limit = account.overdraft_limit.unwrap_or(Amount::ZERO);
    let overdrawn = account.balance.minor().max(-limit.minor()).unsigned_abs() as f64;
    let daily_rate = rate / 365.0;
    let interest = overdrawn * ((1.0 + daily_rate).powi(days as i32) - 1.0);
    Amount(interest.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(balance: i64) -> Account {
        Account {
            id: 1,
            name: "Main".to_string(),
            account_type: AccountType::Current,
            currency_id: 1,
            balance: Amount(balance),
            is_external: false,
            interest_rate: None,
            interest_compounding: None,
            minimum_payment: None,
            overdraft_limit: None,
            overdraft_interest_rate: None,
        }
    }

    #[test]
    fn no_rate_means_no_interest() {
        assert_eq!(accrue_interest(&account(100_000), 30), Amount::ZERO);
    }

    #[test]
    fn daily_compounding_accrues() {
        let mut acc = account(100_000); // £1000.00
        acc.interest_rate = Some(0.0365); // 3.65% -> 0.01% per day
        acc.interest_compounding = Some(COMPOUNDING_DAILY.to_string());

        let one_day = accrue_interest(&acc, 1);
        assert_eq!(one_day, Amount(10)); // £0.10

        let month = accrue_interest(&acc, 30);
        // Compounding beats simple interest slightly.
        assert!(month >= Amount(300));
        assert!(month < Amount(310));
    }

    #[test]
    fn unknown_compounding_is_ignored() {
        let mut acc = account(100_000);
        acc.interest_rate = Some(0.05);
        acc.interest_compounding = Some("hourly".to_string());
        assert_eq!(accrue_interest(&acc, 30), Amount::ZERO);
    }

    #[test]
    fn overdraft_interest_only_when_negative() {
        let mut acc = account(5_000);
        acc.overdraft_interest_rate = Some(0.19);
        acc.overdraft_limit = Some(Amount(50_000));
        assert_eq!(accrue_overdraft_interest(&acc, 30), Amount::ZERO);

        acc.balance = Amount(-10_000);
        let owed = accrue_overdraft_interest(&acc, 30);
        assert!(owed.is_positive());

        // Savings accounts never accrue overdraft interest.
        acc.account_type = AccountType::Savings;
        assert_eq!(accrue_overdraft_interest(&acc, 30), Amount::ZERO);
    }

    #[test]
    fn overdraft_charge_capped_at_limit() {
        let mut acc = account(-100_000);
        acc.overdraft_interest_rate = Some(0.19);
        acc.overdraft_limit = Some(Amount(50_000));
        let capped = accrue_overdraft_interest(&acc, 30);

        acc.balance = Amount(-50_000);
        let at_limit = accrue_overdraft_interest(&acc, 30);
        assert_eq!(capped, at_limit);
    }
}
