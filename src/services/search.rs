use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::{Offer, PassengerSpec, PassengerType, SearchRequest, SliceInput};
use crate::services::distribution::OfferRequestPayload;
use crate::services::enrichment;
use crate::state::AppState;

/// Bounded retry policy for the asynchronous offer-generation poll. The
/// upstream provider has no completion callback, so we poll until offers
/// appear or the attempt budget runs out; exhaustion means "no offers yet",
/// not an error.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl PollPolicy {
    pub fn from_config(config: &crate::config::AppConfig) -> Self {
        Self {
            max_attempts: config.offer_poll_max_attempts.max(1),
            delay: Duration::from_millis(config.offer_poll_delay_ms),
        }
    }
}

const VALID_SORTS: &[&str] = &["total_amount", "total_duration"];

pub struct SearchOutcome {
    pub request_id: String,
    pub offers: Vec<Offer>,
}

pub async fn search_offers(
    state: &Arc<AppState>,
    req: &SearchRequest,
) -> Result<SearchOutcome, AppError> {
    // 1. Normalize input into slices, a flat passenger list and a sort order
    let slices = normalize_slices(req)?;
    let passengers = expand_passengers(req.passengers.as_ref());
    let sort = normalize_sort(req.sort.as_deref())?;

    // 2. Submit the asynchronous offer request
    let payload = OfferRequestPayload {
        slices,
        passengers,
        cabin_class: req.cabin_class.clone(),
        max_connections: req.max_connections,
        currency: req.currency.clone(),
    };
    let request_id = state.distribution.create_offer_request(&payload).await?;
    tracing::info!(request_id = %request_id, "offer request created");

    // 3. Poll for generated offers under the bounded budget
    let policy = PollPolicy::from_config(&state.config);
    let mut offers = Vec::new();
    for attempt in 1..=policy.max_attempts {
        match state.distribution.list_offers(&request_id, sort.as_deref()).await {
            Ok(batch) if !batch.is_empty() => {
                tracing::info!(attempt, count = batch.len(), "offers ready");
                offers = batch;
                break;
            }
            Ok(_) => {}
            Err(e) => {
                // A transient listing failure spends an attempt but does not
                // abort the search; the request itself already succeeded.
                tracing::warn!(attempt, error = %e, "offer listing failed");
            }
        }
        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }

    // 4. Enrichment is best-effort and never removes offers
    enrichment::enrich_offers(state, &mut offers).await;

    Ok(SearchOutcome { request_id, offers })
}

/// Builds the slice list: shorthand origin/destination/date fields become one
/// slice (plus a mirrored return slice when `return_date` is set); an
/// explicit `slices` array is taken verbatim (multi-city).
pub fn normalize_slices(req: &SearchRequest) -> Result<Vec<SliceInput>, AppError> {
    let raw: Vec<SliceInput> = if let Some(slices) = &req.slices {
        slices.clone()
    } else {
        let origin = req.origin.clone().unwrap_or_default();
        let destination = req.destination.clone().unwrap_or_default();
        let departure_date = req.departure_date.clone().unwrap_or_default();

        let mut slices = vec![SliceInput {
            origin: origin.clone(),
            destination: destination.clone(),
            departure_date,
        }];
        if let Some(return_date) = &req.return_date {
            slices.push(SliceInput {
                origin: destination,
                destination: origin,
                departure_date: return_date.clone(),
            });
        }
        slices
    };

    if raw.is_empty() {
        return Err(AppError::Validation(
            "at least one slice is required".to_string(),
        ));
    }

    let mut slices = Vec::with_capacity(raw.len());
    for (index, slice) in raw.into_iter().enumerate() {
        let origin = slice.origin.trim().to_uppercase();
        let destination = slice.destination.trim().to_uppercase();

        validate_location_code(&origin)
            .map_err(|msg| AppError::Validation(format!("slice {index}: origin {msg}")))?;
        validate_location_code(&destination)
            .map_err(|msg| AppError::Validation(format!("slice {index}: destination {msg}")))?;

        if NaiveDate::parse_from_str(&slice.departure_date, "%Y-%m-%d").is_err() {
            return Err(AppError::Validation(format!(
                "slice {index}: departure_date must be YYYY-MM-DD, got {:?}",
                slice.departure_date
            )));
        }

        slices.push(SliceInput {
            origin,
            destination,
            departure_date: slice.departure_date,
        });
    }

    Ok(slices)
}

/// The offer listing is ranked by the provider; the requested order is
/// forwarded, never applied locally over a partial page.
pub fn normalize_sort(sort: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(sort) = sort else {
        return Ok(None);
    };
    let sort = sort.trim().to_lowercase();
    if !VALID_SORTS.contains(&sort.as_str()) {
        return Err(AppError::Validation(format!(
            "sort must be one of {VALID_SORTS:?}, got {sort:?}"
        )));
    }
    Ok(Some(sort))
}

fn validate_location_code(code: &str) -> Result<(), String> {
    if code.is_empty() {
        return Err("code must not be empty".to_string());
    }
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!("code must be a 3-letter IATA code, got {code:?}"));
    }
    Ok(())
}

/// Expands counts into the flat typed passenger array the provider expects.
/// Defaults to a single adult when nothing is specified.
pub fn expand_passengers(spec: Option<&PassengerSpec>) -> Vec<PassengerType> {
    let spec = spec.copied().unwrap_or_default();
    let mut passengers = Vec::new();
    for _ in 0..spec.adults {
        passengers.push(PassengerType::Adult);
    }
    for _ in 0..spec.children {
        passengers.push(PassengerType::Child);
    }
    for _ in 0..spec.infants {
        passengers.push(PassengerType::InfantWithoutSeat);
    }
    if passengers.is_empty() {
        passengers.push(PassengerType::Adult);
    }
    passengers
}
