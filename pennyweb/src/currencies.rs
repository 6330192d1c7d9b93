//! Currency registry endpoints.
//!
use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use pennycore::model::{Currency, CurrencyKind};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::server::AppState;

#[derive(Deserialize)]
pub(crate) struct CurrencyCreate {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub kind: CurrencyKind,
    #[serde(default)]
    pub decimals: Option<u32>,
}

#[derive(Deserialize)]
pub(crate) struct CurrencyFilter {
    #[serde(default)]
    pub kind: Option<CurrencyKind>,
}

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CurrencyCreate>,
) -> ApiResult<Json<Currency>> {
    let db = state.db.lock().await;
    let currency = db.create_currency(
        &payload.code,
        &payload.name,
        &payload.symbol,
        payload.kind,
        payload.decimals,
    )?;
    Ok(Json(currency))
}

pub(crate) async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CurrencyFilter>,
) -> ApiResult<Json<Vec<Currency>>> {
    let db = state.db.lock().await;
    Ok(Json(db.list_currencies(filter.kind)?))
}
