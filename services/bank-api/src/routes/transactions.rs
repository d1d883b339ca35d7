use crate::error::Result;
use crate::AppState;
use actix_web::{web, HttpResponse};
use bank_core::{AccountId, BankId, Error};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from_account: String,
    pub to_account: String,
    pub amount: i64,
    pub to_bank: Option<String>,
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreditRequest {
    pub account_id: String,
    pub amount: i64,
    pub from_bank: Option<String>,
    pub from_account: Option<String>,
    pub idempotency_key: Option<String>,
}

/// `POST /transfer`: same-bank transfer, or the outbound debit leg of an
/// inter-bank transfer when `to_bank` names another bank
pub async fn transfer(
    state: web::Data<AppState>,
    req: web::Json<TransferRequest>,
) -> Result<HttpResponse> {
    let engine = &state.engine;
    let from = AccountId::new(&req.from_account);
    let to = AccountId::new(&req.to_account);
    let to_bank = req
        .to_bank
        .as_deref()
        .map(BankId::new)
        .unwrap_or_else(|| engine.bank_id().clone());

    if &to_bank == engine.bank_id() {
        let (debit, credit) = engine.transfer_local(&from, &to, req.amount)?;
        Ok(HttpResponse::Ok().json(json!({
            "status": "completed",
            "inter_bank": false,
            "debit": debit,
            "credit": credit,
        })))
    } else {
        // Outbound leg only: the credit happens at the receiving bank,
        // driven by the clearing house.
        let outcome = engine.debit(
            &from,
            req.amount,
            to.as_str(),
            &to_bank,
            req.idempotency_key.as_deref(),
        )?;
        Ok(HttpResponse::Ok().json(json!({
            "status": "debited",
            "inter_bank": true,
            "duplicate": outcome.is_duplicate(),
            "transaction": outcome.record(),
        })))
    }
}

/// `POST /internal/credit`: incoming credit leg of an inter-bank transfer
pub async fn internal_credit(
    state: web::Data<AppState>,
    req: web::Json<CreditRequest>,
) -> Result<HttpResponse> {
    let account_id = AccountId::new(&req.account_id);
    let from_bank = req
        .from_bank
        .as_deref()
        .map(BankId::new)
        .unwrap_or_else(|| BankId::new("external"));
    let from_account = req.from_account.as_deref().unwrap_or("external");

    let outcome = state.engine.credit(
        &account_id,
        req.amount,
        from_account,
        &from_bank,
        req.idempotency_key.as_deref(),
    )?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "credited",
        "duplicate": outcome.is_duplicate(),
        "transaction": outcome.record(),
    })))
}

/// `GET /transactions/{account_id}`: recent history plus account summary
pub async fn history(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let account_id = AccountId::new(path.into_inner());
    let account = state
        .engine
        .account(&account_id)
        .ok_or_else(|| Error::AccountNotFound(account_id.to_string()))?;
    let transactions = state.engine.history(&account_id);

    Ok(HttpResponse::Ok().json(json!({
        "account_id": account.account_id,
        "owner_name": account.owner_name,
        "bank": account.bank_id,
        "transactions": transactions,
    })))
}
