use crate::error::Result;
use crate::AppState;
use actix_web::{web, HttpResponse};
use bank_core::{AccountId, Error};

/// `GET /balance/{account_id}`: account snapshot or 404
pub async fn check_balance(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let account_id = AccountId::new(path.into_inner());
    let account = state
        .engine
        .account(&account_id)
        .ok_or_else(|| Error::AccountNotFound(account_id.to_string()))?;
    Ok(HttpResponse::Ok().json(account))
}
