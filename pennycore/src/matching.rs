//! Reconciliation: pair up ledger entries that look like the two halves of
//! one transfer.
//!
//! Two entries match when they carry opposite equal amounts on different
//! accounts within a small day window. Descriptions mentioning pot-style
//! keywords classify the pair as a pot transfer.
//!
use serde::{Deserialize, Serialize};

use crate::ledger::LedgerEntry;

/// Keywords banks use for moves into savings spaces.
const POT_TRANSFER_KEYWORDS: &[&str] = &[
    "pot transfer",
    "savings space",
    "vault transfer",
    "space transfer",
];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransferType {
    AccountTransfer,
    PotTransfer,
}

/// A candidate pairing of a debit entry with a matching credit entry.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TransferMatch {
    pub source: LedgerEntry,
    pub dest: LedgerEntry,
    pub days_apart: i64,
    pub transfer_type: TransferType,
}

fn is_pot_transfer(entry: &LedgerEntry) -> bool {
    let description = entry.description.to_lowercase();
    POT_TRANSFER_KEYWORDS
        .iter()
        .any(|keyword| description.contains(keyword))
}

/// Find candidate transfer pairs among `entries`.
///
/// Results are sorted pot transfers first, then by day distance, so the
/// likeliest matches surface at the top of a review list.
pub fn find_transfer_matches(entries: &[LedgerEntry], max_days_apart: i64) -> Vec<TransferMatch> {
    let mut matches = Vec::new();

    for (i, a) in entries.iter().enumerate() {
        for b in &entries[i + 1..] {
            if a.account_id == b.account_id {
                continue;
            }
            if a.amount.minor() != -b.amount.minor() || a.amount.minor() == 0 {
                continue;
            }
            let days_apart = (a.date - b.date).num_days().abs();
            if days_apart > max_days_apart {
                continue;
            }
            let transfer_type = if is_pot_transfer(a) || is_pot_transfer(b) {
                TransferType::PotTransfer
            } else {
                TransferType::AccountTransfer
            };
            // Source is the debit side (negative), dest the credit side.
            let (source, dest) = if a.amount.is_negative() {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            };
            matches.push(TransferMatch {
                source,
                dest,
                days_apart,
                transfer_type,
            });
        }
    }

    matches.sort_by_key(|m| (m.transfer_type == TransferType::AccountTransfer, m.days_apart));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Amount;
    use chrono::NaiveDate;

    fn entry(id: i64, account_id: i64, day: u32, amount: i64, description: &str) -> LedgerEntry {
        LedgerEntry {
            leg_id: id,
            transaction_id: id,
            account_id,
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            description: description.to_string(),
            amount: Amount(amount),
        }
    }

    #[test]
    fn pairs_opposite_amounts_across_accounts() {
        let entries = vec![
            entry(1, 1, 1, -5_000, "to savings"),
            entry(2, 2, 2, 5_000, "from current"),
            entry(3, 1, 1, -1_200, "groceries"),
        ];
        let matches = find_transfer_matches(&entries, 3);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].source.account_id, 1);
        assert_eq!(matches[0].dest.account_id, 2);
        assert_eq!(matches[0].days_apart, 1);
        assert_eq!(matches[0].transfer_type, TransferType::AccountTransfer);
    }

    #[test]
    fn window_and_same_account_exclusions() {
        let entries = vec![
            entry(1, 1, 1, -5_000, "a"),
            entry(2, 2, 10, 5_000, "too far"),
            entry(3, 1, 2, 5_000, "same account"),
        ];
        assert!(find_transfer_matches(&entries, 3).is_empty());
    }

    #[test]
    fn pot_keywords_classify_and_sort_first() {
        let entries = vec![
            entry(1, 1, 1, -5_000, "regular move"),
            entry(2, 2, 3, 5_000, "regular move"),
            entry(3, 3, 1, -2_000, "Pot Transfer: Holiday"),
            entry(4, 4, 1, 2_000, "holiday fund"),
        ];
        let matches = find_transfer_matches(&entries, 3);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].transfer_type, TransferType::PotTransfer);
        assert_eq!(matches[0].days_apart, 0);
        assert_eq!(matches[1].transfer_type, TransferType::AccountTransfer);
    }
}
