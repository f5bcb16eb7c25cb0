use serde::{Deserialize, Serialize};

/// Trip request as submitted by the client. Either the shorthand
/// origin/destination/date fields or an explicit `slices` array (multi-city)
/// may be used; the search service normalizes both into slices.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub slices: Option<Vec<SliceInput>>,
    pub passengers: Option<PassengerSpec>,
    pub cabin_class: Option<String>,
    pub max_connections: Option<u8>,
    pub sort: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SliceInput {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PassengerSpec {
    #[serde(default)]
    pub adults: u8,
    #[serde(default)]
    pub children: u8,
    #[serde(default)]
    pub infants: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerType {
    Adult,
    Child,
    InfantWithoutSeat,
}
