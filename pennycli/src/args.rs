//! Command-line argument parsing
//!
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// pennywise - personal budgeting from the command line
#[derive(Parser, Debug)]
#[command(name = "pennycli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage accounts, pots, transactions and statement imports")]
pub struct Args {
    /// Path of the SQLite database file
    #[arg(long, value_name = "FILE", global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage accounts
    #[command(subcommand)]
    Account(AccountCmd),
    /// Manage savings pots
    #[command(subcommand)]
    Pot(PotCmd),
    /// Record and list transactions
    #[command(subcommand)]
    Tx(TxCmd),
    /// Manage currencies and exchange rates
    #[command(subcommand)]
    Currency(CurrencyCmd),
    /// Manage statement import formats
    #[command(subcommand)]
    Format(FormatCmd),
    /// Import a bank statement
    #[command(subcommand)]
    Import(ImportCmd),
    /// Reconcile transactions
    #[command(subcommand)]
    Reconcile(ReconcileCmd),
}

#[derive(Subcommand, Debug)]
pub enum AccountCmd {
    /// Create a new account
    Create {
        #[arg(short, long, help = "Account name")]
        name: String,
        #[arg(short = 't', long = "type", default_value = "current", help = "Account type")]
        account_type: String,
        #[arg(short, long, default_value = "GBP", help = "Currency code")]
        currency: String,
        #[arg(short, long, default_value = "0", help = "Opening balance")]
        balance: String,
        #[arg(long, help = "Mark the account as external (a counterparty)")]
        external: bool,
    },
    /// List all accounts and their balances
    List,
}

#[derive(Subcommand, Debug)]
pub enum PotCmd {
    /// Create a pot inside an account
    Create {
        #[arg(short, long, help = "Owning account id")]
        account_id: i64,
        #[arg(short, long, help = "Pot name")]
        name: String,
        #[arg(short, long, default_value = "0", help = "Target amount")]
        target: String,
        #[arg(short, long, default_value = "0", help = "Initial amount moved into the pot")]
        initial: String,
    },
    /// List pots of an account
    List {
        #[arg(short, long, help = "Owning account id")]
        account_id: i64,
    },
    /// Move money between an account and one of its pots
    Transfer {
        #[arg(short, long, help = "Owning account id")]
        account_id: i64,
        #[arg(short, long, help = "Pot id")]
        pot_id: i64,
        #[arg(short, long, value_enum, help = "Direction of the move")]
        direction: PotDirectionArg,
        #[arg(long, help = "Amount to move")]
        amount: String,
        #[arg(long, help = "Date of the transfer (YYYY-MM-DD, defaults to today)")]
        date: Option<NaiveDate>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PotDirectionArg {
    /// Account into pot
    ToPot,
    /// Pot back into the account
    FromPot,
}

#[derive(Subcommand, Debug)]
pub enum TxCmd {
    /// Transfer between two internal accounts
    Transfer {
        #[arg(short, long, help = "Source account id")]
        from: i64,
        #[arg(short, long, help = "Destination account id")]
        to: i64,
        #[arg(long, help = "Amount to transfer")]
        amount: String,
        #[arg(short, long, help = "Description")]
        description: Option<String>,
        #[arg(long, help = "Date of the transfer (YYYY-MM-DD, defaults to today)")]
        date: Option<NaiveDate>,
    },
    /// Record a payment to or from an external account
    External {
        #[arg(short, long, help = "Internal account id")]
        account_id: i64,
        #[arg(short, long, help = "External counterparty account id")]
        external_id: i64,
        #[arg(short, long, value_enum, help = "Direction of the payment")]
        direction: ExternalDirectionArg,
        #[arg(long, help = "Amount of the payment")]
        amount: String,
        #[arg(short, long, help = "Note")]
        note: Option<String>,
        #[arg(long, help = "Date of the payment (YYYY-MM-DD, defaults to today)")]
        date: Option<NaiveDate>,
    },
    /// List ledger entries of an account
    List {
        #[arg(short, long, help = "Account id")]
        account_id: i64,
        #[arg(long, help = "Start date (inclusive)")]
        from: Option<NaiveDate>,
        #[arg(long, help = "End date (inclusive)")]
        to: Option<NaiveDate>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExternalDirectionArg {
    /// Money coming into the internal account
    In,
    /// Money leaving the internal account
    Out,
}

#[derive(Subcommand, Debug)]
pub enum CurrencyCmd {
    /// Register a currency
    Add {
        #[arg(short, long, help = "Currency code, e.g. GBP")]
        code: String,
        #[arg(short, long, help = "Display name")]
        name: String,
        #[arg(short, long, help = "Symbol, e.g. £")]
        symbol: String,
        #[arg(short, long, default_value = "fiat", help = "Kind (fiat or crypto)")]
        kind: String,
        #[arg(short, long, help = "Minor unit decimals (defaults per kind)")]
        decimals: Option<u32>,
    },
    /// List registered currencies
    List {
        #[arg(short, long, help = "Filter by kind (fiat or crypto)")]
        kind: Option<String>,
    },
    /// Record an exchange rate
    Rate {
        #[arg(help = "Source currency code")]
        from: String,
        #[arg(help = "Target currency code")]
        to: String,
        #[arg(help = "Units of target per unit of source")]
        rate: f64,
    },
    /// Convert an amount between currencies at the latest rate
    Convert {
        #[arg(help = "Amount in the source currency")]
        amount: String,
        #[arg(help = "Source currency code")]
        from: String,
        #[arg(help = "Target currency code")]
        to: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum FormatCmd {
    /// Add an import format
    Add {
        #[arg(short, long, help = "Format name")]
        name: String,
        #[arg(
            short,
            long,
            help = "Comma-separated column names: date,amount,description"
        )]
        columns: String,
        #[arg(long, default_value = "%Y-%m-%d", help = "Date format of the statement")]
        date_format: String,
        #[arg(long, help = "Currency symbol stripped from amounts")]
        currency_symbol: Option<String>,
        #[arg(long, default_value = "utf-8-sig", help = "Statement file encoding")]
        encoding: String,
    },
    /// List import formats
    List,
    /// Show one import format in full
    Show {
        #[arg(help = "Format id")]
        id: i64,
    },
    /// Export a format as JSON
    Export {
        #[arg(help = "Format id")]
        id: i64,
        #[arg(help = "Destination file")]
        path: PathBuf,
    },
    /// Import a format from a JSON file
    Import {
        #[arg(help = "JSON file produced by export")]
        path: PathBuf,
    },
    /// Make a format the default for an account
    SetAccount {
        #[arg(help = "Format id")]
        format_id: i64,
        #[arg(help = "Account id")]
        account_id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ImportCmd {
    /// Parse a CSV bank statement and show its summary
    Csv {
        #[arg(help = "Statement file")]
        file: PathBuf,
        #[arg(short, long, help = "Import format name")]
        format: Option<String>,
        #[arg(short, long, help = "Account whose default format should be used")]
        account_id: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReconcileCmd {
    /// Find potential transfer matches between accounts
    Match {
        #[arg(long, help = "Start date for matching")]
        from: Option<NaiveDate>,
        #[arg(long, help = "End date for matching")]
        to: Option<NaiveDate>,
        #[arg(short, long, default_value_t = 3, help = "Maximum days between the two sides")]
        days: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_account_create() {
        let args = Args::try_parse_from([
            "pennycli", "account", "create", "--name", "Main", "--currency", "EUR",
        ])
        .unwrap();
        match args.command {
            Command::Account(AccountCmd::Create {
                name,
                account_type,
                currency,
                ..
            }) => {
                assert_eq!(name, "Main");
                assert_eq!(account_type, "current");
                assert_eq!(currency, "EUR");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_global_db_flag_after_subcommand() {
        let args =
            Args::try_parse_from(["pennycli", "account", "list", "--db", "/tmp/test.db"]).unwrap();
        assert_eq!(args.db.as_deref(), Some(std::path::Path::new("/tmp/test.db")));
    }

    #[test]
    fn reconcile_match_defaults_to_three_days() {
        let args = Args::try_parse_from(["pennycli", "reconcile", "match"]).unwrap();
        match args.command {
            Command::Reconcile(ReconcileCmd::Match { days, .. }) => assert_eq!(days, 3),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
