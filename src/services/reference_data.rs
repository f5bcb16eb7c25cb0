use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::models::Airline;
use crate::services::distribution::DistributionProvider;

/// Best-effort in-memory cache of airline reference data, keyed by IATA
/// carrier code. Used only to enrich display fields; a miss or upstream
/// failure never blocks booking and is never surfaced to the caller.
pub struct AirlineCache {
    entries: RwLock<HashMap<String, Airline>>,
}

impl AirlineCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn lookup(
        &self,
        provider: &dyn DistributionProvider,
        iata_code: &str,
    ) -> Option<Airline> {
        if let Some(hit) = self.entries.read().await.get(iata_code) {
            return Some(hit.clone());
        }

        match provider.get_airline(iata_code).await {
            Ok(Some(airline)) => {
                self.entries
                    .write()
                    .await
                    .insert(iata_code.to_string(), airline.clone());
                Some(airline)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(code = %iata_code, error = %e, "airline lookup failed");
                None
            }
        }
    }
}

impl Default for AirlineCache {
    fn default() -> Self {
        Self::new()
    }
}
