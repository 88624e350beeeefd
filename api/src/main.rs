mod config;
mod handler;
mod service;

use axum::{
    routing::{delete, get},
    Router,
};
use config::ApiConfig;
use connectors::{
    currency_directory::OpenExchangeRatesDirectory, exchange_rate_api::ExchangeRateApiConnector,
    ConnectorConfig,
};
use service::DashboardService;
use std::sync::Arc;
use store::{AlertStore, LocalStore};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting FxBoard API");

    // Load configuration from environment
    let api_config = ApiConfig::from_env();
    let connector_config = ConnectorConfig::from_env();
    let store_config = store::StoreConfig::from_env()
        .map_err(|e| format!("Failed to load store configuration: {}", e))?;

    info!("Persisting alerts in {}", store_config.path.display());
    let alerts = AlertStore::new(LocalStore::new(store_config));

    // Create outbound connectors
    let rates = Arc::new(
        ExchangeRateApiConnector::new(&connector_config)
            .map_err(|e| format!("Failed to create rate connector: {}", e))?,
    );
    let directory = Arc::new(
        OpenExchangeRatesDirectory::new(&connector_config)
            .map_err(|e| format!("Failed to create currency directory: {}", e))?,
    );

    let service = Arc::new(DashboardService::new(rates, directory, alerts));

    // Create CORS middleware
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Create Axum router with API routes
    let app = Router::new()
        .route("/api/v1/currencies", get(handler::list_currencies))
        .route("/api/v1/rates/:base", get(handler::get_rates))
        .route("/api/v1/table", get(handler::get_table))
        .route("/api/v1/convert", get(handler::get_conversion))
        .route(
            "/api/v1/dashboard",
            get(handler::get_dashboard).post(handler::update_dashboard),
        )
        .route(
            "/api/v1/alerts",
            get(handler::list_alerts).post(handler::create_alert),
        )
        .route("/api/v1/alerts/:id", delete(handler::delete_alert))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service);

    // Start server
    let addr = api_config.socket_addr();
    info!("Listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
