use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use super::current_user;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::AncillarySelection;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CartResponse {
    offer_id: String,
    selections: Vec<AncillarySelection>,
}

// GET /api/ancillaries/:offer_id
pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(offer_id): Path<String>,
) -> Result<Json<CartResponse>, AppError> {
    let user_id = current_user(&headers)?;

    let selections = {
        let db = state.db.lock().unwrap();
        queries::get_ancillary_selections(&db, &user_id, &offer_id).map_err(AppError::Internal)?
    };

    match selections {
        Some(selections) => Ok(Json(CartResponse {
            offer_id,
            selections,
        })),
        None => Err(AppError::NotFound(format!(
            "no ancillary selections for offer {offer_id}"
        ))),
    }
}

// PUT /api/ancillaries/:offer_id
//
// Replaces the whole selection list for this (user, offer) pair.
pub async fn upsert_cart(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(offer_id): Path<String>,
    Json(selections): Json<Vec<AncillarySelection>>,
) -> Result<Json<CartResponse>, AppError> {
    let user_id = current_user(&headers)?;

    for (index, selection) in selections.iter().enumerate() {
        if selection.id.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "selection {index}: service id must not be empty"
            )));
        }
        if selection.quantity == 0 {
            return Err(AppError::Validation(format!(
                "selection {index}: quantity must be at least 1"
            )));
        }
    }

    {
        let db = state.db.lock().unwrap();
        queries::upsert_ancillary_selections(&db, &user_id, &offer_id, &selections)
            .map_err(AppError::Internal)?;
    }
    tracing::info!(user_id = %user_id, offer_id = %offer_id, count = selections.len(), "ancillary cart updated");

    Ok(Json(CartResponse {
        offer_id,
        selections,
    }))
}

// DELETE /api/ancillaries/:offer_id
pub async fn clear_cart(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(offer_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = current_user(&headers)?;

    let cleared = {
        let db = state.db.lock().unwrap();
        queries::clear_ancillary_selections(&db, &user_id, &offer_id).map_err(AppError::Internal)?
    };

    Ok(Json(serde_json::json!({ "cleared": cleared })))
}
