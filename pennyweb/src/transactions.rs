//! Ledger transaction endpoints.
//!
use std::sync::Arc;

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::extract::State;
use chrono::NaiveDate;
use pennycore::Amount;
use pennycore::ledger::{ExternalDirection, PotDirection};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiResult;
use crate::server::AppState;

#[derive(Deserialize)]
pub(crate) struct TransferIn {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: Amount,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
}

#[derive(Deserialize)]
pub(crate) struct PotTransferIn {
    pub account_id: i64,
    pub pot_id: i64,
    pub direction: PotDirection,
    pub amount: Amount,
    pub date: NaiveDate,
}

#[derive(Deserialize)]
pub(crate) struct ExternalPaymentIn {
    pub account_id: i64,
    pub external_account_id: i64,
    pub direction: ExternalDirection,
    pub amount: Amount,
    #[serde(default)]
    pub note: Option<String>,
    pub date: NaiveDate,
}

pub(crate) async fn transfer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TransferIn>,
) -> ApiResult<impl IntoResponse> {
    let mut db = state.db.lock().await;
    let tx = db.transfer(
        payload.from_account_id,
        payload.to_account_id,
        payload.amount,
        payload.description.as_deref(),
        payload.date,
    )?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Transfer completed", "transaction": tx })),
    ))
}

pub(crate) async fn pot_transfer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PotTransferIn>,
) -> ApiResult<impl IntoResponse> {
    let mut db = state.db.lock().await;
    let tx = db.pot_transfer(
        payload.account_id,
        payload.pot_id,
        payload.direction,
        payload.amount,
        payload.date,
    )?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Pot transfer completed", "transaction": tx })),
    ))
}

pub(crate) async fn external(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ExternalPaymentIn>,
) -> ApiResult<impl IntoResponse> {
    let mut db = state.db.lock().await;
    let tx = db.external_payment(
        payload.account_id,
        payload.external_account_id,
        payload.direction,
        payload.amount,
        payload.note.as_deref(),
        payload.date,
    )?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Payment recorded", "transaction": tx })),
    ))
}
