use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order as reported by the distribution provider. This is upstream truth;
/// the local Booking row is only a mirror of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderOrder {
    pub id: String,
    pub booking_reference: String,
    pub total_amount: String,
    pub total_currency: String,
    #[serde(default)]
    pub payment_status: OrderPaymentStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPaymentStatus {
    #[serde(default)]
    pub awaiting_payment: bool,
    pub payment_required_by: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Derived per request from upstream payment state, never cached locally.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HoldStatus {
    pub awaiting_payment: bool,
    pub payment_expired: bool,
    pub payment_required_by: Option<DateTime<Utc>>,
}
