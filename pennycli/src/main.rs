//! pennycli crate entrypoint.
//!
//! Command-line client for the pennywise ledger. Talks directly to the
//! SQLite store; the database path comes from `--db`, the `PENNYWISE_DB`
//! environment variable, or `budget.db` in that order.
//!
/// Command-line argument structs
mod args;
/// Command implementations
mod commands;
/// Terminal output helpers
mod render;

use std::path::PathBuf;

use clap::Parser;
use pennycore::{Result, Store};
use tracing_subscriber::EnvFilter;

use args::{Args, Command};

fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn db_path(args: &Args) -> PathBuf {
    args.db.clone().unwrap_or_else(|| {
        std::env::var("PENNYWISE_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("budget.db"))
    })
}

fn run(args: Args) -> Result<()> {
    let mut db = Store::open(db_path(&args))?;
    db.seed_currencies()?;
    match args.command {
        Command::Account(cmd) => commands::accounts::run(&mut db, cmd),
        Command::Pot(cmd) => commands::accounts::run_pot(&mut db, cmd),
        Command::Tx(cmd) => commands::transactions::run(&mut db, cmd),
        Command::Currency(cmd) => commands::currencies::run(&mut db, cmd),
        Command::Format(cmd) => commands::formats::run(&mut db, cmd),
        Command::Import(cmd) => commands::imports::run(&mut db, cmd),
        Command::Reconcile(cmd) => commands::reconcile::run(&mut db, cmd),
    }
}

fn main() {
    init_logger();
    let args = Args::parse();
    if let Err(err) = run(args) {
        render::fail("Error:", &err.to_string());
        std::process::exit(1);
    }
}
