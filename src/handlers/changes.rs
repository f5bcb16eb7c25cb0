use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::current_user;
use crate::errors::AppError;
use crate::models::{ChangeRequestInput, OrderChangeRequest};
use crate::services::changes;
use crate::state::AppState;

// POST /api/orders/:id/changes
pub async fn open_change_request(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<ChangeRequestInput>,
) -> Result<Json<OrderChangeRequest>, AppError> {
    let user_id = current_user(&headers)?;
    let change_request = changes::open_change_request(&state, &user_id, &id, &input).await?;
    Ok(Json(change_request))
}

#[derive(Deserialize)]
pub struct ConfirmChangeRequest {
    pub order_change_offer_id: String,
}

// POST /api/order_changes/:change_request_id/confirm
pub async fn confirm_change(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(change_request_id): Path<String>,
    Json(req): Json<ConfirmChangeRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = current_user(&headers)?;

    let outcome = changes::confirm_change(
        &state,
        &user_id,
        &change_request_id,
        &req.order_change_offer_id,
    )
    .await?;

    let mut body = serde_json::to_value(&outcome.change).unwrap_or_else(|_| json!({}));
    if let Some(warning) = outcome.persistence_warning {
        body["persistence_warning"] = json!(warning);
    }

    Ok(Json(body))
}
