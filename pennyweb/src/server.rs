//! Web server module for pennywise.
//!
//! Assembles the JSON API router, opens the ledger database, and binds the
//! listener on all interfaces. Handlers live in the per-resource modules
//! (`accounts`, `transactions`, ...); they share the `Store` through
//! `AppState`.
//!
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use pennycore::{Result, Store};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::CONFIG;
use crate::{accounts, auth, categories, currencies, forecast, scheduled, transactions};

/// Application state shared by all handlers
pub(crate) struct AppState {
    /// The ledger database behind all API operations
    pub(crate) db: Mutex<Store>,
}

/// Build the API router over a shared state.
pub(crate) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/accounts", post(accounts::create).get(accounts::list))
        .route("/accounts/{id}", get(accounts::get_one))
        .route("/accounts/{id}/pots", post(accounts::create_pot))
        .route("/transactions/transfer", post(transactions::transfer))
        .route("/transactions/pot-transfer", post(transactions::pot_transfer))
        .route("/transactions/external", post(transactions::external))
        .route("/categories", post(categories::create).get(categories::list))
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::remove),
        )
        .route("/scheduled", post(scheduled::create).get(scheduled::list))
        .route("/scheduled/{id}", get(scheduled::get_one))
        .route("/forecast", get(forecast::occurrences))
        .route("/forecast/balances", get(forecast::balances))
        .route("/currencies", post(currencies::create).get(currencies::list))
        .with_state(state)
        // The API is consumed by browser frontends on other origins.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Open the database and serve the API until shutdown.
pub async fn run() -> Result<()> {
    let store = Store::open(&CONFIG.db_path)?;
    if CONFIG.seed_currencies {
        store.seed_currencies()?;
    }
    let state = Arc::new(AppState {
        db: Mutex::new(store),
    });

    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], CONFIG.port));
    tracing::info!(%addr, db = %CONFIG.db_path, "pennywise API listening");

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
