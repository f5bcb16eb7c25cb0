use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::current_user;
use super::orders::BookingResponse;
use crate::errors::AppError;
use crate::models::HoldStatus;
use crate::services::hold;
use crate::state::AppState;

// GET /api/orders/:id/hold
pub async fn get_hold_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<HoldStatus>, AppError> {
    let user_id = current_user(&headers)?;
    let status = hold::get_status(&state, &user_id, &id).await?;
    Ok(Json(status))
}

#[derive(Deserialize)]
pub struct PayHoldRequest {
    pub amount: String,
    pub currency: String,
}

// POST /api/orders/:id/payment
pub async fn pay_hold_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<PayHoldRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = current_user(&headers)?;

    let outcome = hold::pay(&state, &user_id, &id, &req.amount, &req.currency).await?;

    let mut body = serde_json::to_value(BookingResponse::from_booking(outcome.booking))
        .unwrap_or_else(|_| json!({}));
    if let Some(warning) = outcome.persistence_warning {
        body["persistence_warning"] = json!(warning);
    }

    Ok(Json(body))
}
