use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerInput {
    #[serde(rename = "type")]
    pub passenger_type: Option<String>,
    pub title: String,
    pub given_name: String,
    pub family_name: String,
    pub gender: String,
    pub born_on: String,
    pub email: String,
    pub phone_number: String,
}

/// One structural problem with one passenger record. Order creation returns
/// every problem found, not just the first, so the caller can show them all
/// at once.
#[derive(Debug, Clone, Serialize)]
pub struct PassengerFieldError {
    pub passenger_index: usize,
    pub field: &'static str,
    pub message: String,
}
