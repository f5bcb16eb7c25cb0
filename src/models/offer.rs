use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priced, time-limited quote returned by the distribution provider. Offers
/// are leased, never owned: they must be re-fetched and re-validated before
/// any action that spends money.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    pub total_amount: String,
    pub total_currency: String,
    pub expires_at: DateTime<Utc>,
    pub owner: Option<Airline>,
    pub slices: Vec<OfferSlice>,
}

impl Offer {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferSlice {
    pub origin: String,
    pub destination: String,
    pub duration: Option<String>,
    pub segments: Vec<Segment>,
}

/// One flown leg operated by a single carrier under one flight number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub departing_at: String,
    pub arriving_at: String,
    pub carrier_code: String,
    pub carrier_name: Option<String>,
    pub carrier_logo_url: Option<String>,
    pub carrier_conditions_url: Option<String>,
    pub flight_number: String,
    pub aircraft: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airline {
    pub iata_code: String,
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub conditions_url: Option<String>,
}
