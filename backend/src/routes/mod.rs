//! Route definitions for the Inventory Allocation System

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::verify_hub_signature, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/warehouses", get(handlers::list_warehouses))
        .route("/stocks", get(handlers::list_stocks))
        // Purchase requests
        .nest("/purchase/request", purchase_request_routes())
        // Hub webhook (signed when a webhook secret is configured)
        .nest("/webhook", webhook_routes(state))
}

/// Purchase request routes
fn purchase_request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchase_requests).post(handlers::create_purchase_request),
        )
        .route(
            "/:id",
            get(handlers::get_purchase_request)
                .put(handlers::update_purchase_request)
                .delete(handlers::delete_purchase_request),
        )
}

/// Inbound hub webhook routes
fn webhook_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/receive-stock", post(handlers::receive_stock))
        .route_layer(middleware::from_fn_with_state(state, verify_hub_signature))
}
