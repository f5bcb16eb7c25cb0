use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::models::PassengerFieldError;
use crate::services::distribution::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("passenger details failed validation")]
    PassengerValidation(Vec<PassengerFieldError>),

    #[error("offer {offer_id} has expired")]
    OfferExpired { offer_id: String },

    #[error("offer price has changed")]
    PriceChanged {
        offer_id: String,
        current_amount: String,
        current_currency: String,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("payment deadline has passed")]
    DeadlinePassed,

    #[error("order is not awaiting payment")]
    NotAwaitingPayment,

    #[error("distribution provider error: {message}")]
    Upstream {
        code: Option<String>,
        message: String,
    },

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Machine-readable error kind, stable across message wording changes.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Validation(_) => "validation_error",
            AppError::PassengerValidation(_) => "validation_error",
            AppError::OfferExpired { .. } => "offer_expired",
            AppError::PriceChanged { .. } => "price_changed",
            AppError::NotFound(_) => "not_found",
            AppError::Unauthorized => "unauthorized",
            AppError::DeadlinePassed => "deadline_passed",
            AppError::NotAwaitingPayment => "not_awaiting_payment",
            AppError::Upstream { .. } => "upstream_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Rejected { code, message, .. } => AppError::Upstream {
                code: Some(code),
                message,
            },
            other => AppError::Upstream {
                code: None,
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::PassengerValidation(_) => StatusCode::BAD_REQUEST,
            AppError::OfferExpired { .. } => StatusCode::GONE,
            AppError::PriceChanged { .. } => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::DeadlinePassed => StatusCode::GONE,
            AppError::NotAwaitingPayment => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        };

        let mut body = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });

        // Recovery data so the client can re-prompt without another round trip.
        match &self {
            AppError::PassengerValidation(errors) => {
                body["errors"] = serde_json::to_value(errors).unwrap_or_default();
            }
            AppError::PriceChanged {
                offer_id,
                current_amount,
                current_currency,
            } => {
                body["offer_id"] = json!(offer_id);
                body["current_amount"] = json!(current_amount);
                body["current_currency"] = json!(current_currency);
            }
            AppError::OfferExpired { offer_id } => {
                body["offer_id"] = json!(offer_id);
            }
            AppError::Upstream { code: Some(code), .. } => {
                body["upstream_code"] = json!(code);
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                body["message"] = json!("internal error");
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                body["message"] = json!("internal error");
            }
            _ => {}
        }

        (status, axum::Json(body)).into_response()
    }
}
