//! Reconciliation commands.
//!
use pennycore::matching::{TransferType, find_transfer_matches};
use pennycore::{Result, Store};

use crate::args::ReconcileCmd;
use crate::render;

pub fn run(db: &mut Store, cmd: ReconcileCmd) -> Result<()> {
    match cmd {
        ReconcileCmd::Match { from, to, days } => {
            let entries = db.entries_between(from, to)?;
            if entries.is_empty() {
                render::warn("No transactions found in date range");
                return Ok(());
            }
            let matches = find_transfer_matches(&entries, days);
            if matches.is_empty() {
                render::warn("No potential transfer matches found");
                return Ok(());
            }
            for m in &matches {
                let title = match m.transfer_type {
                    TransferType::PotTransfer => "Potential Pot Transfer",
                    TransferType::AccountTransfer => "Potential Account Transfer",
                };
                println!("{title} ({} days apart)", m.days_apart);
                render::table(
                    &["Direction", "Date", "Amount", "Description", "Account"],
                    &[
                        vec![
                            "FROM".to_string(),
                            m.source.date.to_string(),
                            m.source.amount.minor().to_string(),
                            m.source.description.clone(),
                            format!("Account {}", m.source.account_id),
                        ],
                        vec![
                            "TO".to_string(),
                            m.dest.date.to_string(),
                            m.dest.amount.minor().to_string(),
                            m.dest.description.clone(),
                            format!("Account {}", m.dest.account_id),
                        ],
                    ],
                );
                println!();
            }
        }
    }
    Ok(())
}
