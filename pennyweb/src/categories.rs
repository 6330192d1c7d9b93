//! Category endpoints.
//!
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use pennycore::model::{Category, CategoryNode};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiResult;
use crate::server::AppState;

#[derive(Deserialize)]
pub(crate) struct CategoryCreate {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// A missing field leaves the value untouched, an explicit null clears it.
#[derive(Deserialize)]
pub(crate) struct CategoryUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Option<i64>>,
}

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CategoryCreate>,
) -> ApiResult<Json<Category>> {
    let db = state.db.lock().await;
    let cat = db.create_category(&payload.name, payload.parent_id)?;
    Ok(Json(cat))
}

pub(crate) async fn list(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CategoryNode>>> {
    let db = state.db.lock().await;
    Ok(Json(db.category_hierarchy()?))
}

pub(crate) async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> ApiResult<Json<Category>> {
    let db = state.db.lock().await;
    let cat = db.update_category(id, payload.name.as_deref(), payload.parent_id)?;
    Ok(Json(cat))
}

pub(crate) async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let db = state.db.lock().await;
    db.delete_category(id)?;
    Ok(Json(json!({ "message": "Category deleted" })))
}
