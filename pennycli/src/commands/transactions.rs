//! Transaction commands.
//!
use pennycore::ledger::ExternalDirection;
use pennycore::{Result, Store};

use super::{account_with_currency, parse_account_amount};
use crate::args::{ExternalDirectionArg, TxCmd};
use crate::render;

pub fn run(db: &mut Store, cmd: TxCmd) -> Result<()> {
    match cmd {
        TxCmd::Transfer {
            from,
            to,
            amount,
            description,
            date,
        } => {
            let amount = parse_account_amount(db, from, &amount)?;
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let tx = db.transfer(from, to, amount, description.as_deref(), date)?;
            render::ok("Transfer completed:", &format!("transaction {}", tx.id));
        }
        TxCmd::External {
            account_id,
            external_id,
            direction,
            amount,
            note,
            date,
        } => {
            let amount = parse_account_amount(db, account_id, &amount)?;
            let direction = match direction {
                ExternalDirectionArg::In => ExternalDirection::In,
                ExternalDirectionArg::Out => ExternalDirection::Out,
            };
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let tx = db.external_payment(
                account_id,
                external_id,
                direction,
                amount,
                note.as_deref(),
                date,
            )?;
            render::ok("Payment recorded:", &format!("transaction {}", tx.id));
        }
        TxCmd::List {
            account_id,
            from,
            to,
        } => {
            let (_, currency) = account_with_currency(db, account_id)?;
            let entries = db.account_entries(account_id, from, to)?;
            if entries.is_empty() {
                render::warn("No transactions found");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = entries
                .iter()
                .map(|entry| {
                    vec![
                        entry.transaction_id.to_string(),
                        entry.date.to_string(),
                        entry.amount.format(currency.decimals),
                        entry.description.clone(),
                    ]
                })
                .collect();
            render::table(&["Tx", "Date", "Amount", "Description"], &rows);
        }
    }
    Ok(())
}
