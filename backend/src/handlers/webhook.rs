//! HTTP handler for the hub delivery webhook

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;

use crate::error::{AppError, AppResult};
use crate::services::webhook::{ReceiveStockInput, ReceiveStockResult, WebhookService};
use crate::AppState;
use shared::ApiResponse;

/// Receive a delivery confirmation
/// POST /webhook/receive-stock
///
/// Idempotent: repeating a delivery for a COMPLETED request returns
/// `alreadyProcessed: true` without touching stock.
pub async fn receive_stock(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<ReceiveStockInput>, AppError>,
) -> AppResult<Json<ApiResponse<ReceiveStockResult>>> {
    let service = WebhookService::new(state.db);
    let result = service.receive_stock(input).await?;
    Ok(Json(ApiResponse::with_message(result.message(), result)))
}
