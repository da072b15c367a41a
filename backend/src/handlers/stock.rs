//! HTTP handlers for stock levels

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::error::{AppError, AppResult};
use crate::models::Stock;
use crate::services::stock::{StockFilter, StockService};
use crate::AppState;
use shared::ApiResponse;

/// List stock levels, optionally filtered by warehouse or product
pub async fn list_stocks(
    State(state): State<AppState>,
    WithRejection(Query(filter), _): WithRejection<Query<StockFilter>, AppError>,
) -> AppResult<Json<ApiResponse<Vec<Stock>>>> {
    let service = StockService::new(state.db);
    let stocks = service.list_stocks(filter).await?;
    Ok(Json(ApiResponse::data(stocks)))
}
