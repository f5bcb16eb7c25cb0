use serde::{Deserialize, Serialize};

/// One staged service selection (seat, bag, cancel-for-any-reason). The cart
/// is advisory: it reserves nothing and prices nothing, order creation
/// re-resolves services against the live offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AncillarySelection {
    pub id: String,
    pub quantity: u32,
    pub passenger_id: Option<String>,
    pub segment_id: Option<String>,
}

/// Purchasable add-on reported by the provider for a given offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableService {
    pub id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub total_amount: String,
    pub total_currency: String,
    #[serde(default)]
    pub passenger_ids: Vec<String>,
    #[serde(default)]
    pub segment_ids: Vec<String>,
    #[serde(default)]
    pub maximum_quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatMap {
    pub id: String,
    pub slice_id: String,
    pub segment_id: String,
    pub cabins: serde_json::Value,
}
