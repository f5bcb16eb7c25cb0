use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Locally persisted record of a successfully created order. `flight_details`
/// is a frozen copy of the offer used at creation time so the trip can be
/// redisplayed after the offer itself has expired upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub order_id: String,
    pub booking_reference: String,
    pub total_amount: String,
    pub total_currency: String,
    pub passenger_details: serde_json::Value,
    pub flight_details: serde_json::Value,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::Confirmed,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    AwaitingPayment,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::AwaitingPayment => "awaiting_payment",
            PaymentStatus::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "awaiting_payment" => PaymentStatus::AwaitingPayment,
            _ => PaymentStatus::Paid,
        }
    }
}
