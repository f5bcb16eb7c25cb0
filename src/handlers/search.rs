use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use super::current_user;
use crate::errors::AppError;
use crate::models::{Offer, SearchRequest};
use crate::services::search;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SearchResponse {
    request_id: String,
    offers: Vec<Offer>,
    meta: SearchMeta,
}

#[derive(Serialize)]
pub struct SearchMeta {
    offer_count: usize,
}

// POST /api/flights/search
pub async fn search_flights(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let user_id = current_user(&headers)?;
    tracing::info!(user_id = %user_id, "flight search");

    let outcome = search::search_offers(&state, &req).await?;

    Ok(Json(SearchResponse {
        request_id: outcome.request_id,
        meta: SearchMeta {
            offer_count: outcome.offers.len(),
        },
        offers: outcome.offers,
    }))
}
