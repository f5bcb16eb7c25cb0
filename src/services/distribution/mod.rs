pub mod duffel;

use async_trait::async_trait;
use serde::Serialize;

use crate::models::{
    Airline, AvailableService, ConfirmedChange, Offer, OrderChangeRequest, PassengerInput,
    PassengerType, ProviderOrder, SeatMap, SliceInput,
};

/// Upstream failure, classified. `Rejected` carries the provider's own error
/// code verbatim so callers can distinguish e.g. a card decline from a
/// deadline failure.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream rejected request ({code}): {message}")]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },

    #[error("unexpected upstream response: {0}")]
    Decode(String),
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::Rejected { status: 404, .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferRequestPayload {
    pub slices: Vec<SliceInput>,
    pub passengers: Vec<PassengerType>,
    pub cabin_class: Option<String>,
    pub max_connections: Option<u8>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceSelection {
    pub id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
pub struct OrderPayload {
    pub offer_id: String,
    pub passengers: Vec<PassengerInput>,
    pub services: Vec<ServiceSelection>,
    pub amount: String,
    pub currency: String,
    /// Hold orders are confirmed with the airline but paid later, before the
    /// provider-imposed deadline.
    pub hold: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ChangeRequestPayload {
    pub order_id: String,
    pub add_slices: Vec<SliceInput>,
    pub remove_slice_ids: Vec<String>,
    pub add_service_ids: Vec<String>,
    pub remove_service_ids: Vec<String>,
}

/// Thin typed surface over the upstream distribution API. Raw
/// request/response mapping and error classification only; all business
/// rules live in the services that call this.
#[async_trait]
pub trait DistributionProvider: Send + Sync {
    /// Submit an asynchronous offer request; offers are generated server-side
    /// and listed separately. Returns the offer request id.
    async fn create_offer_request(
        &self,
        payload: &OfferRequestPayload,
    ) -> Result<String, ProviderError>;

    /// List generated offers for a request, ranked by the provider when a
    /// sort key is given.
    async fn list_offers(
        &self,
        offer_request_id: &str,
        sort: Option<&str>,
    ) -> Result<Vec<Offer>, ProviderError>;

    async fn get_offer(&self, offer_id: &str) -> Result<Offer, ProviderError>;

    async fn get_seat_maps(&self, offer_id: &str) -> Result<Vec<SeatMap>, ProviderError>;

    async fn list_available_services(
        &self,
        offer_id: &str,
    ) -> Result<Vec<AvailableService>, ProviderError>;

    async fn create_order(&self, payload: &OrderPayload) -> Result<ProviderOrder, ProviderError>;

    async fn get_order(&self, order_id: &str) -> Result<ProviderOrder, ProviderError>;

    async fn pay_order(
        &self,
        order_id: &str,
        amount: &str,
        currency: &str,
    ) -> Result<ProviderOrder, ProviderError>;

    async fn create_change_request(
        &self,
        payload: &ChangeRequestPayload,
    ) -> Result<OrderChangeRequest, ProviderError>;

    async fn confirm_change_offer(
        &self,
        change_offer_id: &str,
    ) -> Result<ConfirmedChange, ProviderError>;

    /// Reference lookup used only for display enrichment. `Ok(None)` when the
    /// provider does not know the code.
    async fn get_airline(&self, iata_code: &str) -> Result<Option<Airline>, ProviderError>;
}
