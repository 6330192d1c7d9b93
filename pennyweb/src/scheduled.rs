//! Standing order endpoints.
//!
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use chrono::NaiveDate;
use pennycore::Amount;
use pennycore::model::{Recurrence, ScheduledTransaction};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::server::AppState;

#[derive(Deserialize)]
pub(crate) struct ScheduledCreate {
    pub description: String,
    pub amount: Amount,
    pub from_account_id: i64,
    pub to_account_id: i64,
    #[serde(default)]
    pub from_pot_id: Option<i64>,
    #[serde(default)]
    pub to_pot_id: Option<i64>,
    pub recurrence: Recurrence,
    #[serde(default)]
    pub custom_rule: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub shift_for_holidays: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ScheduledCreate>,
) -> ApiResult<Json<ScheduledTransaction>> {
    let db = state.db.lock().await;
    let item = db.create_scheduled(ScheduledTransaction {
        id: 0,
        description: payload.description,
        amount: payload.amount,
        from_account_id: payload.from_account_id,
        to_account_id: payload.to_account_id,
        from_pot_id: payload.from_pot_id,
        to_pot_id: payload.to_pot_id,
        recurrence: payload.recurrence,
        custom_rule: payload.custom_rule,
        start_date: payload.start_date,
        end_date: payload.end_date,
        shift_for_holidays: payload.shift_for_holidays,
        is_active: payload.is_active,
    })?;
    Ok(Json(item))
}

pub(crate) async fn list(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ScheduledTransaction>>> {
    let db = state.db.lock().await;
    Ok(Json(db.list_scheduled()?))
}

pub(crate) async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ScheduledTransaction>> {
    let db = state.db.lock().await;
    let item = db
        .scheduled(id)?
        .ok_or_else(|| ApiError::not_found("Scheduled transaction not found"))?;
    Ok(Json(item))
}
