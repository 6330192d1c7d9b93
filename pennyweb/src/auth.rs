//! User registration endpoint.
//!
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use pennycore::model::User;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::server::AppState;

#[derive(Deserialize)]
pub(crate) struct RegisterIn {
    pub username: String,
    pub password: String,
}

pub(crate) async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterIn>,
) -> ApiResult<Json<User>> {
    let db = state.db.lock().await;
    let user = db.register_user(&payload.username, &payload.password)?;
    Ok(Json(user))
}
