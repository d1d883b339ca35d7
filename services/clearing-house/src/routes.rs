use crate::error::{ClearingError, Stage};
use crate::saga::{ClearingSaga, TransferIntent};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub saga: Arc<ClearingSaga>,
}

impl ResponseError for ClearingError {
    fn status_code(&self) -> StatusCode {
        match self {
            ClearingError::UnknownBank(_)
            | ClearingError::InvalidAmount(_)
            | ClearingError::DebitFailed { .. } => StatusCode::BAD_REQUEST,
            ClearingError::ReceiverNotFound { .. } => StatusCode::NOT_FOUND,
            ClearingError::RemoteCallFailed { .. } => StatusCode::BAD_GATEWAY,
            ClearingError::InconsistentTransfer { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // Distinct from an ordinary 500: the caller (and any alerting on
            // this endpoint) must be able to tell "possibly applied" from
            // "definitely not applied".
            ClearingError::InconsistentTransfer {
                transfer_id,
                from_bank,
                to_bank,
                amount,
                stage,
                reason,
            } => HttpResponse::InternalServerError().json(json!({
                "error": self.to_string(),
                "state": match stage {
                    Stage::Credit => "CREDIT_FAILED_AFTER_DEBIT",
                    Stage::Debit => "DEBIT_OUTCOME_UNKNOWN",
                },
                "requires_reconciliation": true,
                "transfer_id": transfer_id,
                "from_bank": from_bank,
                "to_bank": to_bank,
                "amount": amount,
                "reason": reason,
            })),
            _ => HttpResponse::build(self.status_code()).json(json!({
                "error": self.to_string()
            })),
        }
    }
}

/// `POST /interbank-transfer`: orchestrate the two-leg saga
pub async fn interbank_transfer(
    state: web::Data<AppState>,
    req: web::Json<TransferIntent>,
) -> Result<HttpResponse, ClearingError> {
    let outcome = state.saga.execute(&req).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Inter-bank transfer completed",
        "transfer": outcome,
    })))
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "running",
        "service": "clearing-house",
    }))
}

/// Register the clearing house routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/interbank-transfer", web::post().to(interbank_transfer));
}
