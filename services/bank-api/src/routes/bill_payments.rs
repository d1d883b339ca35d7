use crate::error::Result;
use crate::AppState;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use bank_core::AccountId;

#[derive(Debug, Deserialize)]
pub struct BillPaymentRequest {
    pub account_holder: String,
    pub biller_code: String,
    pub reference_number: String,
    pub amount: i64,
    pub idempotency_key: Option<String>,
}

/// `POST /bill-payment`: debit the account for an external biller
///
/// Replayed submissions with the same idempotency key return the original
/// payment flagged `duplicate: true`.
pub async fn bill_payment(
    state: web::Data<AppState>,
    req: web::Json<BillPaymentRequest>,
) -> Result<HttpResponse> {
    let account = AccountId::new(&req.account_holder);
    let result = state.engine.bill_payment(
        &account,
        &req.biller_code,
        &req.reference_number,
        req.amount,
        req.idempotency_key.as_deref(),
    )?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Bill payment completed successfully",
        "biller": result.biller,
        "reference_number": result.reference_number,
        "amount": result.amount,
        "duplicate": result.duplicate,
        "transaction": result.transaction,
    })))
}

/// `GET /supported-billers`: this bank's biller catalog
pub async fn supported_billers(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.engine.billers().all())
}
