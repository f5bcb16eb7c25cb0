use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub duffel_api_token: String,
    pub duffel_base_url: String,
    /// Poll policy for asynchronous offer generation: bounded attempts with a
    /// fixed delay, so a search never blocks indefinitely.
    pub offer_poll_max_attempts: u32,
    pub offer_poll_delay_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "flightdesk.db".to_string()),
            duffel_api_token: env::var("DUFFEL_API_TOKEN").unwrap_or_default(),
            duffel_base_url: env::var("DUFFEL_BASE_URL")
                .unwrap_or_else(|_| "https://api.duffel.com".to_string()),
            offer_poll_max_attempts: env::var("OFFER_POLL_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            offer_poll_delay_ms: env::var("OFFER_POLL_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(800),
        }
    }
}
