use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use super::current_user;
use crate::errors::AppError;
use crate::models::{AvailableService, Offer, SeatMap};
use crate::state::AppState;

// GET /api/offers/:offer_id
//
// Live re-fetch so the client can re-validate price and expiry right before
// committing to an order.
pub async fn get_offer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(offer_id): Path<String>,
) -> Result<Json<Offer>, AppError> {
    current_user(&headers)?;

    match state.distribution.get_offer(&offer_id).await {
        Ok(offer) => Ok(Json(offer)),
        Err(e) if e.is_not_found() => Err(AppError::NotFound(format!("offer {offer_id}"))),
        Err(e) => Err(e.into()),
    }
}

// GET /api/offers/:offer_id/seat_maps
pub async fn get_seat_maps(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(offer_id): Path<String>,
) -> Result<Json<Vec<SeatMap>>, AppError> {
    current_user(&headers)?;

    match state.distribution.get_seat_maps(&offer_id).await {
        Ok(seat_maps) => Ok(Json(seat_maps)),
        Err(e) if e.is_not_found() => Err(AppError::NotFound(format!("offer {offer_id}"))),
        Err(e) => Err(e.into()),
    }
}

// GET /api/offers/:offer_id/services
pub async fn get_available_services(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(offer_id): Path<String>,
) -> Result<Json<Vec<AvailableService>>, AppError> {
    current_user(&headers)?;

    match state.distribution.list_available_services(&offer_id).await {
        Ok(services) => Ok(Json(services)),
        Err(e) if e.is_not_found() => Err(AppError::NotFound(format!("offer {offer_id}"))),
        Err(e) => Err(e.into()),
    }
}
