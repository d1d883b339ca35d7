pub mod accounts;
pub mod bill_payments;
pub mod transactions;

use crate::AppState;
use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    bank: String,
}

async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "running".to_string(),
        service: "bank-api".to_string(),
        bank: state.engine.bank_id().to_string(),
    })
}

/// Register the bank service routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/balance/{account_id}", web::get().to(accounts::check_balance))
        .route("/transfer", web::post().to(transactions::transfer))
        .route("/internal/credit", web::post().to(transactions::internal_credit))
        .route(
            "/transactions/{account_id}",
            web::get().to(transactions::history),
        )
        .route("/bill-payment", web::post().to(bill_payments::bill_payment))
        .route(
            "/supported-billers",
            web::get().to(bill_payments::supported_billers),
        );
}
