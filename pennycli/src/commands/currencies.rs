//! Currency commands.
//!
use pennycore::model::CurrencyKind;
use pennycore::{Amount, PennyError, Result, Store};

use crate::args::CurrencyCmd;
use crate::render;

pub fn run(db: &mut Store, cmd: CurrencyCmd) -> Result<()> {
    match cmd {
        CurrencyCmd::Add {
            code,
            name,
            symbol,
            kind,
            decimals,
        } => {
            let kind = CurrencyKind::parse(&kind)?;
            let currency = db.create_currency(&code, &name, &symbol, kind, decimals)?;
            render::ok(
                "Added currency:",
                &format!("{} ({})", currency.code, currency.name),
            );
        }
        CurrencyCmd::List { kind } => {
            let kind = kind.as_deref().map(CurrencyKind::parse).transpose()?;
            let rows: Vec<Vec<String>> = db
                .list_currencies(kind)?
                .iter()
                .map(|c| {
                    vec![
                        c.code.clone(),
                        c.name.clone(),
                        c.symbol.clone(),
                        c.kind.as_str().to_string(),
                        c.decimals.to_string(),
                    ]
                })
                .collect();
            render::table(&["Code", "Name", "Symbol", "Kind", "Decimals"], &rows);
        }
        CurrencyCmd::Rate { from, to, rate } => {
            let recorded = db.set_exchange_rate(&from, &to, rate, None)?;
            render::ok(
                "Recorded rate:",
                &format!(
                    "{} -> {} = {} at {}",
                    from.to_uppercase(),
                    to.to_uppercase(),
                    recorded.rate,
                    recorded.timestamp
                ),
            );
        }
        CurrencyCmd::Convert { amount, from, to } => {
            let source = db
                .currency_by_code(&from)?
                .ok_or(PennyError::NotFound("currency"))?;
            let target = db
                .currency_by_code(&to)?
                .ok_or(PennyError::NotFound("currency"))?;
            let amount = Amount::parse(&amount, source.decimals)?;
            match db.convert_amount(amount, &from, &to, None)? {
                Some(converted) => println!(
                    "{} {} = {} {}",
                    amount.format(source.decimals),
                    source.code,
                    converted.format(target.decimals),
                    target.code
                ),
                None => render::warn(&format!(
                    "No exchange rate recorded for {} -> {}",
                    source.code, target.code
                )),
            }
        }
    }
    Ok(())
}
