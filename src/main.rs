use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use flightdesk::config::AppConfig;
use flightdesk::db;
use flightdesk::handlers;
use flightdesk::services::distribution::duffel::DuffelProvider;
use flightdesk::services::reference_data::AirlineCache;
use flightdesk::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    anyhow::ensure!(
        !config.duffel_api_token.is_empty(),
        "DUFFEL_API_TOKEN must be set"
    );

    let conn = db::init_db(&config.database_url)?;

    let distribution = DuffelProvider::new(
        config.duffel_api_token.clone(),
        config.duffel_base_url.clone(),
    );
    tracing::info!(base_url = %config.duffel_base_url, "using Duffel distribution provider");

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        distribution: Box::new(distribution),
        airlines: AirlineCache::new(),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/flights/search",
            post(handlers::search::search_flights),
        )
        .route("/api/offers/:offer_id", get(handlers::offers::get_offer))
        .route(
            "/api/offers/:offer_id/seat_maps",
            get(handlers::offers::get_seat_maps),
        )
        .route(
            "/api/offers/:offer_id/services",
            get(handlers::offers::get_available_services),
        )
        .route(
            "/api/ancillaries/:offer_id",
            get(handlers::ancillaries::get_cart),
        )
        .route(
            "/api/ancillaries/:offer_id",
            put(handlers::ancillaries::upsert_cart),
        )
        .route(
            "/api/ancillaries/:offer_id",
            delete(handlers::ancillaries::clear_cart),
        )
        .route("/api/orders", post(handlers::orders::create_order))
        .route("/api/orders", get(handlers::orders::list_orders))
        .route("/api/orders/:id", get(handlers::orders::get_order))
        .route("/api/orders/:id/hold", get(handlers::hold::get_hold_status))
        .route(
            "/api/orders/:id/payment",
            post(handlers::hold::pay_hold_order),
        )
        .route(
            "/api/orders/:id/changes",
            post(handlers::changes::open_change_request),
        )
        .route(
            "/api/order_changes/:change_request_id/confirm",
            post(handlers::changes::confirm_change),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
