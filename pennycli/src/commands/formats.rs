//! Import format commands.
//!
use pennycore::model::ImportFormat;
use pennycore::{PennyError, Result, Store};

use crate::args::FormatCmd;
use crate::render;

fn optional_column(cols: &[&str], index: usize) -> Option<String> {
    cols.get(index)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn run(db: &mut Store, cmd: FormatCmd) -> Result<()> {
    match cmd {
        FormatCmd::Add {
            name,
            columns,
            date_format,
            currency_symbol,
            encoding,
        } => {
            let cols: Vec<&str> = columns.split(',').map(str::trim).collect();
            if cols.len() < 3 {
                return Err(PennyError::invalid(
                    "--columns needs date,amount,description",
                ));
            }
            let fmt = db.create_import_format(&ImportFormat {
                id: 0,
                name,
                date_column: cols[0].to_string(),
                amount_column: cols[1].to_string(),
                description_column: cols[2].to_string(),
                type_column: optional_column(&cols, 3),
                balance_column: optional_column(&cols, 4),
                reference_column: optional_column(&cols, 5),
                date_format,
                thousands_separator: ",".to_string(),
                decimal_separator: ".".to_string(),
                currency_symbol: currency_symbol.unwrap_or_default(),
                encoding,
                notes: None,
                account_id: None,
            })?;
            render::ok("Added format:", &fmt.name);
        }
        FormatCmd::List => {
            let mut rows = Vec::new();
            for fmt in db.list_import_formats()? {
                let account = match fmt.account_id {
                    Some(id) => db
                        .account(id)?
                        .map(|a| a.name)
                        .unwrap_or_else(|| id.to_string()),
                    None => String::new(),
                };
                rows.push(vec![
                    fmt.id.to_string(),
                    fmt.name,
                    fmt.date_column,
                    fmt.amount_column,
                    fmt.description_column,
                    account,
                ]);
            }
            render::table(
                &["ID", "Name", "Date Col", "Amount Col", "Desc Col", "Account"],
                &rows,
            );
        }
        FormatCmd::Show { id } => {
            let fmt = db
                .import_format(id)?
                .ok_or(PennyError::NotFound("import format"))?;
            println!("{}", serde_json::to_string_pretty(&fmt)?);
        }
        FormatCmd::Export { id, path } => {
            db.export_format_json(id, &path)?;
            render::ok("Exported format to", &path.display().to_string());
        }
        FormatCmd::Import { path } => {
            let fmt = db.import_format_json(&path)?;
            render::ok("Imported format:", &fmt.name);
        }
        FormatCmd::SetAccount {
            format_id,
            account_id,
        } => {
            db.set_account_format(account_id, format_id)?;
            render::ok(
                "Default format set:",
                &format!("format {format_id} for account {account_id}"),
            );
        }
    }
    Ok(())
}
