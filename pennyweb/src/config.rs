//! Configuration loader and defaults for the pennyweb server.
//!
//! Exposes a lazily-initialized `CONFIG` which reads values from environment
//! variables (with sensible defaults). Fields include the listening port,
//! the SQLite database path, and whether to seed the currency registry on
//! startup.
//!
use std::env;

use once_cell::sync::Lazy;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DB_PATH: &str = "budget.db";

/// Application configuration for the web server
pub struct Config {
    /// HTTP listening port
    pub port: u16,
    /// Path of the SQLite database file
    pub db_path: String,
    /// Seed common currencies into a fresh database on startup
    pub seed_currencies: bool,
}

/// Global application configuration instance, lazily initialized
pub static CONFIG: Lazy<Config> = Lazy::new(|| Config {
    port: env::var("PENNYWISE_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT),
    db_path: env::var("PENNYWISE_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.into()),
    seed_currencies: env::var("PENNYWISE_SEED_CURRENCIES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(true),
});
