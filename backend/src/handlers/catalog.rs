//! HTTP handlers for products and warehouses

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;

use crate::error::{AppError, AppResult};
use crate::models::{Product, Warehouse};
use crate::services::catalog::{CatalogService, CreateProductInput};
use crate::AppState;
use shared::ApiResponse;

/// List all products
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let service = CatalogService::new(state.db);
    let products = service.list_products().await?;
    Ok(Json(ApiResponse::data(products)))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<CreateProductInput>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let service = CatalogService::new(state.db);
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(product))))
}

/// List all warehouses
pub async fn list_warehouses(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Warehouse>>>> {
    let service = CatalogService::new(state.db);
    let warehouses = service.list_warehouses().await?;
    Ok(Json(ApiResponse::data(warehouses)))
}
