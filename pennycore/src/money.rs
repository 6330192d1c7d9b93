//! Money represented as integer minor units.
//!
//! Every amount in the ledger is an `i64` count of the owning currency's
//! smallest unit (cents, satoshi...). The currency's `decimals` field says
//! where the point sits when rendering or parsing decimal strings. Keeping
//! amounts integral makes balance arithmetic exact; only interest accrual
//! goes through floating point.
//!
use serde::{Deserialize, Serialize};

use crate::error::{PennyError, Result};

/// An amount in minor units of some currency.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct Amount(pub i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn minor(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn abs(self) -> Amount {
        Amount(self.0.abs())
    }

    /// Parse a plain decimal string (`"12.50"`, `"-3"`) into minor units.
    ///
    /// More than `decimals` fractional digits is rejected rather than
    /// silently rounded.
    pub fn parse(s: &str, decimals: u32) -> Result<Amount> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PennyError::invalid("empty amount"));
        }
        let (sign, digits) = match s.strip_prefix('-') {
            Some(rest) => (-1i64, rest),
            None => (1i64, s.strip_prefix('+').unwrap_or(s)),
        };
        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        if frac.len() as u32 > decimals {
            return Err(PennyError::invalid(format!(
                "amount {s} has more than {decimals} decimal places"
            )));
        }
        if whole.is_empty() && frac.is_empty() {
            return Err(PennyError::invalid(format!("invalid amount: {s}")));
        }
        // Signs were handled above; anything non-digit past this point
        // (including a sign inside the fraction) is malformed.
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PennyError::invalid(format!("invalid amount: {s}")));
        }
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| PennyError::invalid(format!("invalid amount: {s}")))?
        };
        let scale = 10i64.pow(decimals);
        let mut frac_minor: i64 = 0;
        if !frac.is_empty() {
            let parsed: i64 = frac
                .parse()
                .map_err(|_| PennyError::invalid(format!("invalid amount: {s}")))?;
            frac_minor = parsed * 10i64.pow(decimals - frac.len() as u32);
        }
        whole
            .checked_mul(scale)
            .and_then(|w| w.checked_add(frac_minor))
            .map(|v| Amount(sign * v))
            .ok_or_else(|| PennyError::invalid(format!("amount out of range: {s}")))
    }

    /// Parse an amount as found in a bank statement column.
    ///
    /// Strips a leading currency symbol and thousands separators, then
    /// normalizes the decimal separator before delegating to [`Amount::parse`].
    pub fn parse_statement(
        raw: &str,
        currency_symbol: &str,
        thousands_separator: &str,
        decimal_separator: &str,
        decimals: u32,
    ) -> Result<Amount> {
        let mut s = raw.trim().to_string();
        if !currency_symbol.is_empty() {
            s = s.replace(currency_symbol, "");
        }
        if !thousands_separator.is_empty() {
            s = s.replace(thousands_separator, "");
        }
        if decimal_separator != "." {
            s = s.replace(decimal_separator, ".");
        }
        Amount::parse(s.trim(), decimals)
    }

    /// Render as a decimal string with `decimals` fractional digits.
    pub fn format(self, decimals: u32) -> String {
        let scale = 10i64.pow(decimals);
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / scale as u64;
        if decimals == 0 {
            format!("{sign}{whole}")
        } else {
            let frac = abs % scale as u64;
            format!("{sign}{whole}.{frac:0width$}", width = decimals as usize)
        }
    }

    pub fn checked_add(self, other: Amount) -> Result<Amount> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or_else(|| PennyError::invalid("amount overflow"))
    }

    pub fn checked_sub(self, other: Amount) -> Result<Amount> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or_else(|| PennyError::invalid("amount overflow"))
    }
}

impl std::ops::Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount(-self.0)
    }
}
