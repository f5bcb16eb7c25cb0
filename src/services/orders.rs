use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, PassengerFieldError, PassengerInput, PaymentStatus};
use crate::services::distribution::{OrderPayload, ServiceSelection};
use crate::state::AppState;

const VALID_TITLES: &[&str] = &["mr", "mrs", "ms", "miss", "dr"];
const VALID_GENDERS: &[&str] = &["m", "f"];

#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub offer_id: String,
    pub passengers: Vec<PassengerInput>,
    pub payment_amount: String,
    pub payment_currency: String,
    #[serde(default)]
    pub hold: bool,
}

/// Outcome of a successful creation. `persistence_warning` is set when the
/// upstream order exists but the local booking row could not be written;
/// money has already moved, so this is a degraded success, never an error.
pub struct CreatedOrder {
    pub booking: Booking,
    pub persistence_warning: Option<String>,
}

pub async fn create_order(
    state: &Arc<AppState>,
    user_id: &str,
    input: CreateOrderInput,
) -> Result<CreatedOrder, AppError> {
    // 1. Structural validation, reporting every problem at once
    if input.passengers.is_empty() {
        return Err(AppError::Validation(
            "at least one passenger is required".to_string(),
        ));
    }
    if parse_minor_units(&input.payment_amount).is_none() {
        return Err(AppError::Validation(format!(
            "payment_amount must be a decimal amount, got {:?}",
            input.payment_amount
        )));
    }
    let errors = validate_passengers(&input.passengers);
    if !errors.is_empty() {
        return Err(AppError::PassengerValidation(errors));
    }

    // 2. Re-fetch the offer; a client-supplied snapshot is never trusted for
    //    pricing
    let offer = match state.distribution.get_offer(&input.offer_id).await {
        Ok(offer) => offer,
        Err(e) if e.is_not_found() => {
            return Err(AppError::NotFound(format!("offer {}", input.offer_id)))
        }
        Err(e) => return Err(e.into()),
    };

    // 3. Expiry checkpoint: an expired offer means re-search, not retry
    if offer.is_expired(Utc::now()) {
        return Err(AppError::OfferExpired {
            offer_id: offer.id.clone(),
        });
    }

    // 4. Price checkpoint: never charge an amount the user did not confirm
    if !amounts_equal(&offer.total_amount, &input.payment_amount)
        || !offer
            .total_currency
            .eq_ignore_ascii_case(&input.payment_currency)
    {
        return Err(AppError::PriceChanged {
            offer_id: offer.id.clone(),
            current_amount: offer.total_amount.clone(),
            current_currency: offer.total_currency.clone(),
        });
    }

    // 5. Attach staged ancillaries; the cart is advisory, the provider
    //    re-prices services at order time
    let services: Vec<ServiceSelection> = {
        let db = state.db.lock().unwrap();
        queries::get_ancillary_selections(&db, user_id, &input.offer_id)
            .unwrap_or(None)
            .unwrap_or_default()
            .into_iter()
            .map(|s| ServiceSelection {
                id: s.id,
                quantity: s.quantity,
            })
            .collect()
    };

    // 6. Create the order upstream
    let payload = OrderPayload {
        offer_id: input.offer_id.clone(),
        passengers: input.passengers.clone(),
        services,
        amount: offer.total_amount.clone(),
        currency: offer.total_currency.clone(),
        hold: input.hold,
    };
    let order = state.distribution.create_order(&payload).await?;
    tracing::info!(order_id = %order.id, reference = %order.booking_reference, "order created");

    // 7. Persist the booking with a frozen copy of the offer for redisplay
    //    after the offer expires upstream
    let now = Utc::now().naive_utc();
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        order_id: order.id.clone(),
        booking_reference: order.booking_reference.clone(),
        total_amount: order.total_amount.clone(),
        total_currency: order.total_currency.clone(),
        passenger_details: serde_json::to_value(&input.passengers)
            .unwrap_or(serde_json::Value::Null),
        flight_details: serde_json::to_value(&offer).unwrap_or(serde_json::Value::Null),
        status: BookingStatus::Confirmed,
        payment_status: if input.hold {
            PaymentStatus::AwaitingPayment
        } else {
            PaymentStatus::Paid
        },
        payment_completed_at: if input.hold { None } else { Some(now) },
        created_at: now,
        updated_at: now,
    };

    let persistence_warning = {
        let db = state.db.lock().unwrap();
        match queries::create_booking(&db, &booking) {
            Ok(()) => {
                // The cart is superseded by the order; a failed delete only
                // leaves a stale advisory row behind
                if let Err(e) = queries::clear_ancillary_selections(&db, user_id, &input.offer_id) {
                    tracing::warn!(error = %e, offer_id = %input.offer_id, "failed to clear ancillary cart");
                }
                None
            }
            Err(e) => {
                tracing::error!(error = %e, order_id = %order.id, "order created upstream but local booking write failed");
                Some(format!(
                    "order {} was created (reference {}) but could not be recorded locally",
                    order.id, order.booking_reference
                ))
            }
        }
    };

    Ok(CreatedOrder {
        booking,
        persistence_warning,
    })
}

/// Checks every passenger and returns the full error list so the caller can
/// display all problems in one pass.
pub fn validate_passengers(passengers: &[PassengerInput]) -> Vec<PassengerFieldError> {
    let mut errors = Vec::new();
    let today = Utc::now().date_naive();

    for (index, p) in passengers.iter().enumerate() {
        let mut push = |field: &'static str, message: String| {
            errors.push(PassengerFieldError {
                passenger_index: index,
                field,
                message,
            });
        };

        if p.given_name.trim().is_empty() {
            push("given_name", "given name is required".to_string());
        }
        if p.family_name.trim().is_empty() {
            push("family_name", "family name is required".to_string());
        }

        if !VALID_TITLES.contains(&p.title.to_lowercase().as_str()) {
            push(
                "title",
                format!("title must be one of {VALID_TITLES:?}, got {:?}", p.title),
            );
        }
        if !VALID_GENDERS.contains(&p.gender.to_lowercase().as_str()) {
            push(
                "gender",
                format!("gender must be one of {VALID_GENDERS:?}, got {:?}", p.gender),
            );
        }

        match NaiveDate::parse_from_str(&p.born_on, "%Y-%m-%d") {
            Ok(born_on) => {
                let age = today.years_since(born_on);
                match age {
                    Some(age) if age <= 120 => {}
                    _ => push(
                        "born_on",
                        format!("date of birth {:?} gives an implausible age", p.born_on),
                    ),
                }
            }
            Err(_) => push(
                "born_on",
                format!("date of birth must be YYYY-MM-DD, got {:?}", p.born_on),
            ),
        }

        if !is_plausible_email(&p.email) {
            push("email", format!("email {:?} is not a valid address", p.email));
        }

        let digits = p.phone_number.chars().filter(|c| c.is_ascii_digit()).count();
        if digits < 10 {
            push(
                "phone_number",
                "phone number must contain at least 10 digits".to_string(),
            );
        }
    }

    errors
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

/// Parses a decimal money string into minor units, so "120.00" and "120.0"
/// compare equal. Returns None for anything that is not a plain decimal.
pub fn parse_minor_units(amount: &str) -> Option<i64> {
    let amount = amount.trim();
    let (integer, fraction) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };

    if integer.is_empty() || !integer.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = integer.parse().ok()?;
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };
    Some(whole * 100 + cents)
}

pub fn amounts_equal(a: &str, b: &str) -> bool {
    match (parse_minor_units(a), parse_minor_units(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
