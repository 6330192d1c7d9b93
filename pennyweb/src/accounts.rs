//! Account and savings-pot endpoints.
//!
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use pennycore::Amount;
use pennycore::accounts::NewAccount;
use pennycore::model::{Account, AccountType, Pot};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::server::AppState;

#[derive(Deserialize)]
pub(crate) struct AccountCreate {
    pub name: String,
    pub account_type: AccountType,
    /// Currency code, e.g. "GBP".
    pub currency: String,
    #[serde(default)]
    pub balance: Amount,
    #[serde(default)]
    pub is_external: bool,
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub interest_compounding: Option<String>,
    #[serde(default)]
    pub minimum_payment: Option<Amount>,
    #[serde(default)]
    pub overdraft_limit: Option<Amount>,
    #[serde(default)]
    pub overdraft_interest_rate: Option<f64>,
}

#[derive(Deserialize)]
pub(crate) struct PotCreate {
    pub name: String,
    #[serde(default)]
    pub target_amount: Amount,
    #[serde(default)]
    pub initial_amount: Amount,
}

/// Account together with its pots and free balance.
#[derive(Serialize)]
pub(crate) struct AccountOut {
    #[serde(flatten)]
    pub account: Account,
    pub pots: Vec<Pot>,
    pub available: Amount,
}

fn account_out(db: &pennycore::Store, account: Account) -> ApiResult<AccountOut> {
    let pots = db.pots_of_account(account.id)?;
    let available = db.available_balance(account.id)?;
    Ok(AccountOut {
        account,
        pots,
        available,
    })
}

pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AccountCreate>,
) -> ApiResult<Json<AccountOut>> {
    let db = state.db.lock().await;
    let currency = db
        .currency_by_code(&payload.currency)?
        .ok_or_else(|| ApiError::bad_request(format!("unknown currency: {}", payload.currency)))?;
    let account = db.create_account(NewAccount {
        name: payload.name,
        account_type: payload.account_type,
        currency_id: currency.id,
        balance: payload.balance,
        is_external: payload.is_external,
        interest_rate: payload.interest_rate,
        interest_compounding: payload.interest_compounding,
        minimum_payment: payload.minimum_payment,
        overdraft_limit: payload.overdraft_limit,
        overdraft_interest_rate: payload.overdraft_interest_rate,
    })?;
    Ok(Json(account_out(&db, account)?))
}

pub(crate) async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AccountOut>> {
    let db = state.db.lock().await;
    let account = db
        .account(id)?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;
    Ok(Json(account_out(&db, account)?))
}

pub(crate) async fn list(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AccountOut>>> {
    let db = state.db.lock().await;
    let mut out = Vec::new();
    for account in db.list_accounts()? {
        out.push(account_out(&db, account)?);
    }
    Ok(Json(out))
}

pub(crate) async fn create_pot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<PotCreate>,
) -> ApiResult<Json<Pot>> {
    let mut db = state.db.lock().await;
    if db.account(id)?.is_none() {
        return Err(ApiError::not_found("Account not found"));
    }
    let pot = db.create_pot(id, &payload.name, payload.target_amount, payload.initial_amount)?;
    Ok(Json(pot))
}
