use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, HoldStatus, ProviderOrder};
use crate::state::AppState;

/// Derives hold-payment state purely from upstream truth. Nothing is cached
/// locally, so the answer can never go stale between requests. A past
/// deadline wins over the nominal awaiting flag: an expired hold is never
/// payable, whatever the upstream flag still says.
pub fn derive_status(order: &ProviderOrder, now: DateTime<Utc>) -> HoldStatus {
    let payment = &order.payment_status;
    let paid = payment.paid_at.is_some();

    let payment_expired = !paid
        && payment
            .payment_required_by
            .map(|deadline| now >= deadline)
            .unwrap_or(false);

    HoldStatus {
        awaiting_payment: payment.awaiting_payment && !paid && !payment_expired,
        payment_expired,
        payment_required_by: payment.payment_required_by,
    }
}

pub async fn get_status(
    state: &Arc<AppState>,
    user_id: &str,
    booking_id: &str,
) -> Result<HoldStatus, AppError> {
    let booking = load_owned(state, user_id, booking_id)?;
    let order = state.distribution.get_order(&booking.order_id).await?;
    Ok(derive_status(&order, Utc::now()))
}

pub struct PaymentOutcome {
    pub booking: Booking,
    pub persistence_warning: Option<String>,
}

pub async fn pay(
    state: &Arc<AppState>,
    user_id: &str,
    booking_id: &str,
    amount: &str,
    currency: &str,
) -> Result<PaymentOutcome, AppError> {
    // 1. Ownership precedes everything; a foreign order looks like a missing
    //    one
    let mut booking = load_owned(state, user_id, booking_id)?;

    // 2. Re-derive status from upstream before attempting capture. This, not
    //    a lock, is what rejects a second concurrent payment attempt.
    let order = state.distribution.get_order(&booking.order_id).await?;
    let status = derive_status(&order, Utc::now());

    if status.payment_expired {
        return Err(AppError::DeadlinePassed);
    }
    if !status.awaiting_payment {
        return Err(AppError::NotAwaitingPayment);
    }

    // 3. Submit payment; an upstream rejection keeps its error code verbatim
    //    so a decline is distinguishable from a deadline failure
    let paid_order = state
        .distribution
        .pay_order(&booking.order_id, amount, currency)
        .await?;
    tracing::info!(order_id = %paid_order.id, "hold order paid");

    // 4. Mirror the result locally; the upstream capture has already
    //    happened, so a failed write is a degraded success
    let persistence_warning = {
        let db = state.db.lock().unwrap();
        match queries::mark_booking_paid(&db, user_id, booking_id) {
            Ok(true) => None,
            Ok(false) => Some(format!(
                "payment for order {} succeeded but the booking record was not found locally",
                booking.order_id
            )),
            Err(e) => {
                tracing::error!(error = %e, order_id = %booking.order_id, "payment succeeded but local update failed");
                Some(format!(
                    "payment for order {} succeeded but could not be recorded locally",
                    booking.order_id
                ))
            }
        }
    };

    let now = Utc::now().naive_utc();
    booking.payment_status = crate::models::PaymentStatus::Paid;
    booking.payment_completed_at = Some(now);
    booking.updated_at = now;

    Ok(PaymentOutcome {
        booking,
        persistence_warning,
    })
}

pub fn load_owned(
    state: &Arc<AppState>,
    user_id: &str,
    booking_id: &str,
) -> Result<Booking, AppError> {
    let db = state.db.lock().unwrap();
    queries::get_owned_booking(&db, user_id, booking_id)
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))
}
