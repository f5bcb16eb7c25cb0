use std::sync::Arc;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{ChangeRequestInput, ConfirmedChange, OrderChangeRequest};
use crate::services::distribution::ChangeRequestPayload;
use crate::services::hold::load_owned;
use crate::services::orders::parse_minor_units;
use crate::state::AppState;

/// Opens a change request against an owned booking. The upstream system
/// either applies the change synchronously or answers with candidate change
/// offers that must be confirmed explicitly; this service never picks one.
pub async fn open_change_request(
    state: &Arc<AppState>,
    user_id: &str,
    booking_id: &str,
    input: &ChangeRequestInput,
) -> Result<OrderChangeRequest, AppError> {
    if input.is_empty() {
        return Err(AppError::Validation(
            "change request must add or remove at least one slice or service".to_string(),
        ));
    }

    let booking = load_owned(state, user_id, booking_id)?;

    let payload = ChangeRequestPayload {
        order_id: booking.order_id.clone(),
        add_slices: input.add_slices.clone(),
        remove_slice_ids: input.remove_slice_ids.clone(),
        add_service_ids: input.add_service_ids.clone(),
        remove_service_ids: input.remove_service_ids.clone(),
    };
    let mut change_request = state.distribution.create_change_request(&payload).await?;
    tracing::info!(
        change_request_id = %change_request.id,
        order_id = %booking.order_id,
        candidates = change_request.candidates.len(),
        "change request opened"
    );

    // Cheapest change first, purely for presentation; the caller still has
    // to name a candidate id to confirm.
    change_request.candidates.sort_by_key(|offer| {
        parse_minor_units(&offer.change_total_amount).unwrap_or(i64::MAX)
    });

    // Recorded locally so confirmation can be ownership-checked, and so
    // removal-only changes leave the same audit trail as offer-picking ones.
    {
        let db = state.db.lock().unwrap();
        if let Err(e) =
            queries::create_change_request(&db, &change_request.id, user_id, booking_id)
        {
            tracing::error!(error = %e, change_request_id = %change_request.id, "failed to record change request");
            return Err(AppError::Internal(e));
        }
    }

    Ok(change_request)
}

pub struct ConfirmOutcome {
    pub change: ConfirmedChange,
    pub persistence_warning: Option<String>,
}

/// Confirms exactly one candidate change offer. Unselected candidates are
/// left to expire upstream; a stale or expired candidate id surfaces the
/// upstream rejection unchanged.
pub async fn confirm_change(
    state: &Arc<AppState>,
    user_id: &str,
    change_request_id: &str,
    change_offer_id: &str,
) -> Result<ConfirmOutcome, AppError> {
    let booking_id = {
        let db = state.db.lock().unwrap();
        queries::get_owned_change_request(&db, user_id, change_request_id)
            .map_err(AppError::Internal)?
            .ok_or_else(|| AppError::NotFound(format!("change request {change_request_id}")))?
    };

    let booking = load_owned(state, user_id, &booking_id)?;

    let change = state
        .distribution
        .confirm_change_offer(change_offer_id)
        .await?;
    tracing::info!(
        change_id = %change.id,
        order_id = %booking.order_id,
        status = %change.status,
        "order change confirmed"
    );

    // The order has already been mutated upstream; a failed local update is a
    // degraded success.
    let persistence_warning = match (&change.new_total_amount, &change.new_total_currency) {
        (Some(amount), Some(currency)) => {
            let db = state.db.lock().unwrap();
            match queries::update_booking_totals(&db, user_id, &booking_id, amount, currency) {
                Ok(true) => None,
                Ok(false) => Some(format!(
                    "change {} was confirmed but the booking record was not found locally",
                    change.id
                )),
                Err(e) => {
                    tracing::error!(error = %e, change_id = %change.id, "change confirmed but local update failed");
                    Some(format!(
                        "change {} was confirmed but could not be recorded locally",
                        change.id
                    ))
                }
            }
        }
        _ => None,
    };

    Ok(ConfirmOutcome {
        change,
        persistence_warning,
    })
}
