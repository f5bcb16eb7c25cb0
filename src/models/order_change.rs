use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::search::SliceInput;

/// Caller-described modification to an existing order. Removal-only changes
/// are valid and go through the same open/confirm protocol.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeRequestInput {
    #[serde(default)]
    pub add_slices: Vec<SliceInput>,
    #[serde(default)]
    pub remove_slice_ids: Vec<String>,
    #[serde(default)]
    pub add_service_ids: Vec<String>,
    #[serde(default)]
    pub remove_service_ids: Vec<String>,
}

impl ChangeRequestInput {
    pub fn is_empty(&self) -> bool {
        self.add_slices.is_empty()
            && self.remove_slice_ids.is_empty()
            && self.add_service_ids.is_empty()
            && self.remove_service_ids.is_empty()
    }
}

/// Result of opening a change request. When `requires_confirmation` is set
/// the caller must confirm exactly one candidate by id; unconfirmed
/// candidates simply expire upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderChangeRequest {
    pub id: String,
    pub order_id: String,
    pub requires_confirmation: bool,
    #[serde(default)]
    pub candidates: Vec<OrderChangeOffer>,
}

/// Expiring, priced candidate for an order change. Analogous to an Offer:
/// re-validated upstream at confirmation time, never trusted from an earlier
/// response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderChangeOffer {
    pub id: String,
    pub change_total_amount: String,
    pub change_total_currency: String,
    pub new_total_amount: String,
    pub new_total_currency: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmedChange {
    pub id: String,
    pub order_id: String,
    pub status: String,
    pub new_total_amount: Option<String>,
    pub new_total_currency: Option<String>,
}
