//! pennyweb crate entrypoint.
//!
//! Starts the Tokio runtime, initializes logging, and launches the web
//! server defined in the `server` module. Keep this file minimal, most
//! application logic lives in `server` and the per-resource handler
//! modules.
//!
/// HTTP server assembly and startup
mod server;
/// Configuration management and settings
mod config;
/// HTTP error mapping
mod error;

/// Account and pot endpoints
mod accounts;
/// User registration endpoint
mod auth;
/// Category endpoints
mod categories;
/// Currency registry endpoints
mod currencies;
/// Forecast endpoints
mod forecast;
/// Standing order endpoints
mod scheduled;
/// Ledger transaction endpoints
mod transactions;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pennyweb=info,tower_http=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}

/// Entry point for the async Tokio runtime
#[tokio::main]
async fn main() {
    init_logger();
    if let Err(err) = server::run().await {
        tracing::error!(%err, "server failed");
        std::process::exit(1);
    }
}
