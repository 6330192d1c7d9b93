//! Forecast endpoints.
//!
use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use pennycore::forecast::{ForecastPoint, ForecastTransaction};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::server::AppState;

#[derive(Deserialize)]
pub(crate) struct ForecastQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub(crate) async fn occurrences(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ForecastQuery>,
) -> ApiResult<Json<Vec<ForecastTransaction>>> {
    let db = state.db.lock().await;
    Ok(Json(db.forecast(query.start_date, query.end_date)?))
}

pub(crate) async fn balances(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ForecastQuery>,
) -> ApiResult<Json<Vec<ForecastPoint>>> {
    let db = state.db.lock().await;
    Ok(Json(db.forecast_balances(query.start_date, query.end_date)?))
}
