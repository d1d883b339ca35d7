use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// HTTP-facing wrapper for core errors
///
/// `AccountNotFound` maps to 404; the remaining validation failures map to
/// 400. All of them are rejected before any mutation, so reporting them
/// directly is safe.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] bank_core::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Core(bank_core::Error::AccountNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Core(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
