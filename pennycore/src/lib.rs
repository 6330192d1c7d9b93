//! pennywise core crate.
//!
//! Domain model, SQLite-backed ledger and the statement import machinery
//! shared by the `pennyweb` server and the `pennycli` client. These modules
//! focus on the needs of the pennywise apps rather than being
//! general-purpose libraries.
//!
/// Crate-wide error type and result alias
pub mod error;
/// Amounts in integer minor units
pub mod money;
/// Domain structs and enums
pub mod model;
/// SQLite store and schema
pub mod store;
/// Account and pot operations
pub mod accounts;
/// Double-entry ledger operations
pub mod ledger;
/// Category tree
pub mod categories;
/// Currency registry and exchange rates
pub mod currencies;
/// Standing orders
pub mod scheduled;
/// Forecast expansion and balance projection
pub mod forecast;
/// What-if scenarios
pub mod scenarios;
/// Interest accrual
pub mod interest;
/// User registration
pub mod auth;
/// CSV statement import and format registry
pub mod imports;
/// Transfer reconciliation
pub mod matching;

pub use error::{PennyError, Result};
pub use money::Amount;
pub use store::Store;
