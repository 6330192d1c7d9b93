//! Account and pot commands.
//!
use pennycore::accounts::NewAccount;
use pennycore::ledger::PotDirection;
use pennycore::model::AccountType;
use pennycore::{Amount, PennyError, Result, Store};

use super::{account_with_currency, parse_account_amount};
use crate::args::{AccountCmd, PotCmd, PotDirectionArg};
use crate::render;

pub fn run(db: &mut Store, cmd: AccountCmd) -> Result<()> {
    match cmd {
        AccountCmd::Create {
            name,
            account_type,
            currency,
            balance,
            external,
        } => {
            let account_type = AccountType::parse(&account_type)?;
            let currency = db
                .currency_by_code(&currency)?
                .ok_or(PennyError::NotFound("currency"))?;
            let balance = Amount::parse(&balance, currency.decimals)?;
            let mut new = NewAccount::new(&name, account_type, currency.id).with_balance(balance);
            if external {
                new = new.external();
            }
            let account = db.create_account(new)?;
            render::ok(
                "Created account:",
                &format!("{} (ID: {}) [{}]", account.name, account.id, currency.code),
            );
        }
        AccountCmd::List => {
            let mut rows = Vec::new();
            for account in db.list_accounts()? {
                let currency = db
                    .currency_by_id(account.currency_id)?
                    .ok_or(PennyError::NotFound("currency"))?;
                let pot_balance = db.pot_holdings(account.id)?;
                let available = db.available_balance(account.id)?;
                rows.push(vec![
                    account.id.to_string(),
                    account.name.clone(),
                    account.account_type.as_str().to_string(),
                    currency.code.clone(),
                    account.balance.format(currency.decimals),
                    pot_balance.format(currency.decimals),
                    available.format(currency.decimals),
                ]);
            }
            render::table(
                &[
                    "ID",
                    "Name",
                    "Type",
                    "Currency",
                    "Balance",
                    "Pot Balance",
                    "Available",
                ],
                &rows,
            );
        }
    }
    Ok(())
}

pub fn run_pot(db: &mut Store, cmd: PotCmd) -> Result<()> {
    match cmd {
        PotCmd::Create {
            account_id,
            name,
            target,
            initial,
        } => {
            let target = parse_account_amount(db, account_id, &target)?;
            let initial = parse_account_amount(db, account_id, &initial)?;
            let pot = db.create_pot(account_id, &name, target, initial)?;
            render::ok(
                "Created pot:",
                &format!("{} (ID: {}) in account {}", pot.name, pot.id, account_id),
            );
        }
        PotCmd::List { account_id } => {
            let (_, currency) = account_with_currency(db, account_id)?;
            let rows: Vec<Vec<String>> = db
                .pots_of_account(account_id)?
                .iter()
                .map(|pot| {
                    vec![
                        pot.id.to_string(),
                        pot.name.clone(),
                        pot.current_amount.format(currency.decimals),
                        pot.target_amount.format(currency.decimals),
                        if pot.is_active { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            render::table(&["ID", "Name", "Current", "Target", "Active"], &rows);
        }
        PotCmd::Transfer {
            account_id,
            pot_id,
            direction,
            amount,
            date,
        } => {
            let amount = parse_account_amount(db, account_id, &amount)?;
            let direction = match direction {
                PotDirectionArg::ToPot => PotDirection::ToPot,
                PotDirectionArg::FromPot => PotDirection::FromPot,
            };
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let tx = db.pot_transfer(account_id, pot_id, direction, amount, date)?;
            render::ok(
                "Pot transfer completed:",
                &format!("transaction {}", tx.id),
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        let db = Store::open_in_memory().unwrap();
        db.seed_currencies().unwrap();
        db
    }

    fn create_main(db: &mut Store) -> i64 {
        run(
            db,
            AccountCmd::Create {
                name: "Main".into(),
                account_type: "current".into(),
                currency: "GBP".into(),
                balance: "100.00".into(),
                external: false,
            },
        )
        .unwrap();
        db.list_accounts().unwrap()[0].id
    }

    #[test]
    fn create_parses_balance_in_minor_units() {
        let mut db = store();
        create_main(&mut db);
        let accounts = db.list_accounts().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].balance.minor(), 10_000);
    }

    #[test]
    fn create_rejects_unknown_currency() {
        let mut db = store();
        let err = run(
            &mut db,
            AccountCmd::Create {
                name: "Main".into(),
                account_type: "current".into(),
                currency: "XXX".into(),
                balance: "0".into(),
                external: false,
            },
        );
        assert!(err.is_err());
    }

    #[test]
    fn pot_create_and_transfer() {
        let mut db = store();
        let account_id = create_main(&mut db);
        run_pot(
            &mut db,
            PotCmd::Create {
                account_id,
                name: "Holiday".into(),
                target: "500".into(),
                initial: "25.00".into(),
            },
        )
        .unwrap();
        let pot_id = db.pots_of_account(account_id).unwrap()[0].id;
        run_pot(
            &mut db,
            PotCmd::Transfer {
                account_id,
                pot_id,
                direction: PotDirectionArg::ToPot,
                amount: "10.00".into(),
                date: None,
            },
        )
        .unwrap();
        let pot = db.pot(pot_id).unwrap().unwrap();
        assert_eq!(pot.current_amount.minor(), 3_500);
    }
}
