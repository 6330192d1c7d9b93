//! Statement import commands.
//!
use pennycore::imports::import_csv;
use pennycore::{Result, Store};

use super::account_with_currency;
use crate::args::ImportCmd;
use crate::render;

pub fn run(db: &mut Store, cmd: ImportCmd) -> Result<()> {
    match cmd {
        ImportCmd::Csv {
            file,
            format,
            account_id,
        } => {
            let fmt = db.resolve_import_format(format.as_deref(), account_id)?;
            let decimals = match account_id {
                Some(id) => account_with_currency(db, id)?.1.decimals,
                None => 2,
            };
            let statement = import_csv(&file, &fmt, decimals)?;
            render::ok(
                "Parsed statement:",
                &format!(
                    "{} transactions, {} to {}",
                    statement.transactions.len(),
                    statement.start_date,
                    statement.end_date
                ),
            );
            println!("  Credits: {}", statement.total_credits().format(decimals));
            println!("  Debits:  {}", statement.total_debits().format(decimals));
            println!("  Net:     {}", statement.net_movement().format(decimals));
            let rows: Vec<Vec<String>> = statement
                .transactions
                .iter()
                .map(|tx| {
                    vec![
                        tx.date.to_string(),
                        tx.amount.format(decimals),
                        tx.tx_type.clone().unwrap_or_default(),
                        tx.description.clone(),
                    ]
                })
                .collect();
            render::table(&["Date", "Amount", "Type", "Description"], &rows);
        }
    }
    Ok(())
}
