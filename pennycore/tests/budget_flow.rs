//! End-to-end flows across the ledger, forecasting and statement import.

use chrono::NaiveDate;
use pennycore::accounts::NewAccount;
use pennycore::ledger::{ExternalDirection, PotDirection};
use pennycore::model::{AccountType, ImportFormat, Recurrence, ScheduledTransaction};
use pennycore::{Amount, Store};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn store() -> Store {
    let db = Store::open_in_memory().unwrap();
    db.seed_currencies().unwrap();
    db
}

#[test]
fn month_of_activity_keeps_balances_consistent() {
    let mut db = store();
    let gbp = db.currency_by_code("GBP").unwrap().unwrap();
    let main = db
        .create_account(
            NewAccount::new("Main", AccountType::Current, gbp.id).with_balance(Amount(100_000)),
        )
        .unwrap();
    let savings = db
        .create_account(NewAccount::new("Savings", AccountType::Savings, gbp.id))
        .unwrap();
    let employer = db
        .create_account(NewAccount::new("Employer", AccountType::Current, gbp.id).external())
        .unwrap();

    db.external_payment(
        main.id,
        employer.id,
        ExternalDirection::In,
        Amount(250_000),
        Some("Salary"),
        date(2026, 1, 25),
    )
    .unwrap();
    db.transfer(
        main.id,
        savings.id,
        Amount(50_000),
        Some("Savings top-up"),
        date(2026, 1, 26),
    )
    .unwrap();
    let pot = db
        .create_pot(savings.id, "Holiday", Amount(100_000), Amount::ZERO)
        .unwrap();
    db.pot_transfer(
        savings.id,
        pot.id,
        PotDirection::ToPot,
        Amount(20_000),
        date(2026, 1, 27),
    )
    .unwrap();

    let main_after = db.account(main.id).unwrap().unwrap();
    assert_eq!(main_after.balance.minor(), 100_000 + 250_000 - 50_000);

    // A pot transfer ring-fences money without changing the account balance.
    let savings_after = db.account(savings.id).unwrap().unwrap();
    assert_eq!(savings_after.balance.minor(), 50_000);
    assert_eq!(db.available_balance(savings.id).unwrap().minor(), 30_000);

    let entries = db.account_entries(main.id, None, None).unwrap();
    assert_eq!(entries.len(), 2);
}

#[test]
fn forecast_expands_standing_orders() {
    let db = store();
    let gbp = db.currency_by_code("GBP").unwrap().unwrap();
    let main = db
        .create_account(
            NewAccount::new("Main", AccountType::Current, gbp.id).with_balance(Amount(500_000)),
        )
        .unwrap();
    let landlord = db
        .create_account(NewAccount::new("Landlord", AccountType::Current, gbp.id).external())
        .unwrap();

    db.create_scheduled(ScheduledTransaction {
        id: 0,
        description: "Rent".into(),
        amount: Amount(120_000),
        from_account_id: main.id,
        to_account_id: landlord.id,
        from_pot_id: None,
        to_pot_id: None,
        recurrence: Recurrence::Monthly,
        custom_rule: None,
        start_date: date(2026, 1, 1),
        end_date: None,
        shift_for_holidays: false,
        is_active: true,
    })
    .unwrap();

    let occurrences = db.forecast(date(2026, 1, 1), date(2026, 3, 31)).unwrap();
    assert_eq!(occurrences.len(), 3);
    assert_eq!(occurrences[0].date, date(2026, 1, 1));
    assert_eq!(occurrences[2].date, date(2026, 3, 1));

    let points = db
        .forecast_balances(date(2026, 1, 1), date(2026, 1, 2))
        .unwrap();
    let main_day_one = points
        .iter()
        .find(|p| p.account_id == main.id && p.date == date(2026, 1, 1))
        .unwrap();
    assert_eq!(main_day_one.balance.minor(), 500_000 - 120_000);
    assert_eq!(main_day_one.amount_out.minor(), 120_000);
}

#[test]
fn statement_import_with_registered_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("statement.csv");
    std::fs::write(
        &path,
        "Date,Amount,Description\n\
         2026-01-05,-12.50,Coffee\n\
         2026-01-06,\"1,000.00\",Salary\n",
    )
    .unwrap();

    let mut db = store();
    let gbp = db.currency_by_code("GBP").unwrap().unwrap();
    let main = db
        .create_account(NewAccount::new("Main", AccountType::Current, gbp.id))
        .unwrap();
    let fmt = db
        .create_import_format(&ImportFormat {
            id: 0,
            name: "test-bank".into(),
            date_column: "Date".into(),
            amount_column: "Amount".into(),
            description_column: "Description".into(),
            type_column: None,
            balance_column: None,
            reference_column: None,
            date_format: "%Y-%m-%d".into(),
            thousands_separator: ",".into(),
            decimal_separator: ".".into(),
            currency_symbol: String::new(),
            encoding: "utf-8".into(),
            notes: None,
            account_id: None,
        })
        .unwrap();
    db.set_account_format(main.id, fmt.id).unwrap();

    let resolved = db.resolve_import_format(None, Some(main.id)).unwrap();
    assert_eq!(resolved.id, fmt.id);

    let statement = pennycore::imports::import_csv(&path, &resolved, gbp.decimals).unwrap();
    assert_eq!(statement.transactions.len(), 2);
    assert_eq!(statement.start_date, date(2026, 1, 5));
    assert_eq!(statement.end_date, date(2026, 1, 6));
    assert_eq!(statement.total_credits().minor(), 100_000);
    assert_eq!(statement.total_debits().minor(), -1_250);
    assert_eq!(statement.net_movement().minor(), 98_750);
}
