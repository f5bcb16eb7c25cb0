use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use super::current_user;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::Booking;
use crate::services::orders::{self, CreateOrderInput};
use crate::state::AppState;

#[derive(Serialize)]
pub struct BookingResponse {
    id: String,
    order_id: String,
    booking_reference: String,
    total_amount: String,
    total_currency: String,
    status: String,
    payment_status: String,
    passenger_details: serde_json::Value,
    flight_details: serde_json::Value,
    payment_completed_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl BookingResponse {
    pub(crate) fn from_booking(b: Booking) -> Self {
        Self {
            id: b.id,
            order_id: b.order_id,
            booking_reference: b.booking_reference,
            total_amount: b.total_amount,
            total_currency: b.total_currency,
            status: b.status.as_str().to_string(),
            payment_status: b.payment_status.as_str().to_string(),
            passenger_details: b.passenger_details,
            flight_details: b.flight_details,
            payment_completed_at: b
                .payment_completed_at
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: b.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// POST /api/orders
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<CreateOrderInput>,
) -> Result<Response, AppError> {
    let user_id = current_user(&headers)?;

    let created = orders::create_order(&state, &user_id, input).await?;

    let mut body = serde_json::to_value(BookingResponse::from_booking(created.booking))
        .unwrap_or_else(|_| json!({}));
    if let Some(warning) = created.persistence_warning {
        body["persistence_warning"] = json!(warning);
    }

    Ok((StatusCode::CREATED, Json(body)).into_response())
}

// GET /api/orders
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let user_id = current_user(&headers)?;

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::get_bookings_for_user(&db, &user_id).map_err(AppError::Internal)?
    };

    Ok(Json(
        bookings
            .into_iter()
            .map(BookingResponse::from_booking)
            .collect(),
    ))
}

// GET /api/orders/:id
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let user_id = current_user(&headers)?;

    let booking = {
        let db = state.db.lock().unwrap();
        queries::get_owned_booking(&db, &user_id, &id).map_err(AppError::Internal)?
    };

    booking
        .map(|b| Json(BookingResponse::from_booking(b)))
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
}
