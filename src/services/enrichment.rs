use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::join_all;

use crate::models::Offer;
use crate::state::AppState;

/// Fills missing airline display fields on offer segments by carrier code.
/// Never drops or reorders offers, never overrides data already present, and
/// swallows every lookup failure: enrichment is cosmetic.
pub async fn enrich_offers(state: &Arc<AppState>, offers: &mut [Offer]) {
    let mut missing: HashSet<String> = HashSet::new();
    for offer in offers.iter() {
        for slice in &offer.slices {
            for segment in &slice.segments {
                if segment.carrier_name.is_none() || segment.carrier_logo_url.is_none() {
                    missing.insert(segment.carrier_code.clone());
                }
            }
        }
    }

    if missing.is_empty() {
        return;
    }

    let lookups = missing.into_iter().map(|code| async move {
        let airline = state
            .airlines
            .lookup(state.distribution.as_ref(), &code)
            .await;
        (code, airline)
    });

    let resolved: HashMap<_, _> = join_all(lookups)
        .await
        .into_iter()
        .filter_map(|(code, airline)| airline.map(|a| (code, a)))
        .collect();

    for offer in offers.iter_mut() {
        for slice in &mut offer.slices {
            for segment in &mut slice.segments {
                let Some(airline) = resolved.get(&segment.carrier_code) else {
                    continue;
                };
                if segment.carrier_name.is_none() {
                    segment.carrier_name = airline.name.clone();
                }
                if segment.carrier_logo_url.is_none() {
                    segment.carrier_logo_url = airline.logo_url.clone();
                }
                if segment.carrier_conditions_url.is_none() {
                    segment.carrier_conditions_url = airline.conditions_url.clone();
                }
            }
        }
    }
}
