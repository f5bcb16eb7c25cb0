use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::{
    ChangeRequestPayload, DistributionProvider, OfferRequestPayload, OrderPayload, ProviderError,
};
use crate::models::{
    Airline, AvailableService, ConfirmedChange, Offer, OrderChangeOffer, OrderChangeRequest,
    ProviderOrder, SeatMap,
};

/// Client for a Duffel-style NDC distribution API: bearer token, `{"data":..}`
/// envelopes, error bodies of the form `{"errors":[{"code","message"}]}`.
pub struct DuffelProvider {
    base_url: String,
    api_token: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<UpstreamError>,
}

#[derive(Deserialize)]
struct UpstreamError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct OfferRequestData {
    id: String,
}

#[derive(Deserialize)]
struct OfferWithServices {
    #[serde(flatten)]
    _offer: serde_json::Value,
    #[serde(default)]
    available_services: Vec<AvailableService>,
}

#[derive(Deserialize)]
struct ChangeRequestData {
    id: String,
    order_id: String,
    #[serde(default)]
    requires_confirmation: bool,
    #[serde(default)]
    order_change_offers: Vec<OrderChangeOffer>,
}

impl DuffelProvider {
    pub fn new(api_token: String, base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(body) => match body.errors.into_iter().next() {
                    Some(e) => (e.code, e.message),
                    None => (String::new(), status.to_string()),
                },
                Err(_) => (String::new(), status.to_string()),
            };
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(envelope.data)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        self.read_response(resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ProviderError> {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.api_token)
            .json(&json!({ "data": body }))
            .send()
            .await?;
        self.read_response(resp).await
    }
}

#[async_trait]
impl DistributionProvider for DuffelProvider {
    async fn create_offer_request(
        &self,
        payload: &OfferRequestPayload,
    ) -> Result<String, ProviderError> {
        let passengers: Vec<_> = payload
            .passengers
            .iter()
            .map(|p| json!({ "type": p }))
            .collect();

        let mut body = json!({
            "slices": payload.slices,
            "passengers": passengers,
        });
        if let Some(cabin) = &payload.cabin_class {
            body["cabin_class"] = json!(cabin);
        }
        if let Some(max) = payload.max_connections {
            body["max_connections"] = json!(max);
        }
        if let Some(currency) = &payload.currency {
            body["currency"] = json!(currency);
        }

        // return_offers=false: offers are generated asynchronously and listed
        // by request id, not returned inline.
        let data: OfferRequestData = self
            .post("/air/offer_requests?return_offers=false", &body)
            .await?;
        Ok(data.id)
    }

    async fn list_offers(
        &self,
        offer_request_id: &str,
        sort: Option<&str>,
    ) -> Result<Vec<Offer>, ProviderError> {
        let mut path = format!("/air/offers?offer_request_id={offer_request_id}");
        if let Some(sort) = sort {
            path.push_str(&format!("&sort={sort}"));
        }
        self.get(&path).await
    }

    async fn get_offer(&self, offer_id: &str) -> Result<Offer, ProviderError> {
        self.get(&format!("/air/offers/{offer_id}")).await
    }

    async fn get_seat_maps(&self, offer_id: &str) -> Result<Vec<SeatMap>, ProviderError> {
        self.get(&format!("/air/seat_maps?offer_id={offer_id}")).await
    }

    async fn list_available_services(
        &self,
        offer_id: &str,
    ) -> Result<Vec<AvailableService>, ProviderError> {
        let data: OfferWithServices = self
            .get(&format!("/air/offers/{offer_id}?return_available_services=true"))
            .await?;
        Ok(data.available_services)
    }

    async fn create_order(&self, payload: &OrderPayload) -> Result<ProviderOrder, ProviderError> {
        let services: Vec<_> = payload
            .services
            .iter()
            .map(|s| json!({ "id": s.id, "quantity": s.quantity }))
            .collect();

        let mut body = json!({
            "selected_offers": [payload.offer_id],
            "passengers": payload.passengers,
            "services": services,
        });

        if payload.hold {
            body["type"] = json!("hold");
        } else {
            body["type"] = json!("instant");
            body["payments"] = json!([{
                "type": "balance",
                "amount": payload.amount,
                "currency": payload.currency,
            }]);
        }

        self.post("/air/orders", &body).await
    }

    async fn get_order(&self, order_id: &str) -> Result<ProviderOrder, ProviderError> {
        self.get(&format!("/air/orders/{order_id}")).await
    }

    async fn pay_order(
        &self,
        order_id: &str,
        amount: &str,
        currency: &str,
    ) -> Result<ProviderOrder, ProviderError> {
        let body = json!({
            "order_id": order_id,
            "payment": {
                "type": "balance",
                "amount": amount,
                "currency": currency,
            },
        });
        let _: serde_json::Value = self.post("/air/payments", &body).await?;

        // The payment response carries the payment object, not the order;
        // re-fetch so the caller sees the settled payment state.
        self.get_order(order_id).await
    }

    async fn create_change_request(
        &self,
        payload: &ChangeRequestPayload,
    ) -> Result<OrderChangeRequest, ProviderError> {
        let body = json!({
            "order_id": payload.order_id,
            "slices": {
                "add": payload.add_slices,
                "remove": payload.remove_slice_ids.iter()
                    .map(|id| json!({ "slice_id": id }))
                    .collect::<Vec<_>>(),
            },
            "services": {
                "add": payload.add_service_ids.iter()
                    .map(|id| json!({ "id": id }))
                    .collect::<Vec<_>>(),
                "remove": payload.remove_service_ids.iter()
                    .map(|id| json!({ "id": id }))
                    .collect::<Vec<_>>(),
            },
        });

        let data: ChangeRequestData = self.post("/air/order_change_requests", &body).await?;
        Ok(OrderChangeRequest {
            id: data.id,
            order_id: data.order_id,
            requires_confirmation: data.requires_confirmation,
            candidates: data.order_change_offers,
        })
    }

    async fn confirm_change_offer(
        &self,
        change_offer_id: &str,
    ) -> Result<ConfirmedChange, ProviderError> {
        // Two upstream calls by provider design: select the change offer,
        // then confirm the resulting pending change.
        let body = json!({ "selected_order_change_offer": change_offer_id });
        let pending: ConfirmedChange = self.post("/air/order_changes", &body).await?;

        self.post(
            &format!("/air/order_changes/{}/actions/confirm", pending.id),
            &json!({}),
        )
        .await
    }

    async fn get_airline(&self, iata_code: &str) -> Result<Option<Airline>, ProviderError> {
        match self
            .get::<Airline>(&format!("/air/airlines/{iata_code}"))
            .await
        {
            Ok(airline) => Ok(Some(airline)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
