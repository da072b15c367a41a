//! Inventory Allocation System - Backend
//!
//! Warehouses, products and stock levels, plus a purchase-request workflow
//! that hands submitted requests to the supplier hub and reconciles stock
//! when the hub confirms delivery.

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use config::Config;
use error::{AppError, AppResult};
use external::HubClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub hub: HubClient,
}

impl AppState {
    /// Build state from a pool and loaded configuration
    pub fn new(db: sqlx::PgPool, config: Config) -> AppResult<Self> {
        let hub = HubClient::from_config(&config.hub)?;
        Ok(Self {
            db,
            config: Arc::new(config),
            hub,
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> AppResult<Router> {
    let cors = cors_layer(&state.config.server.cors_origin)?;

    Ok(Router::new()
        .merge(routes::api_routes(state.clone()))
        .fallback(handlers::route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state))
}

/// CORS restricted to the configured frontend origin
fn cors_layer(origin: &str) -> AppResult<CorsLayer> {
    let origin = origin.parse::<HeaderValue>().map_err(|_| {
        AppError::Configuration(format!("Invalid server.cors_origin: {}", origin))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}
