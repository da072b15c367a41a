//! HTTP handlers for purchase-request endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::error::{AppError, AppResult};
use crate::models::PurchaseRequest;
use crate::services::purchase_request::{
    CreatePurchaseRequestInput, PurchaseRequestService, UpdatePurchaseRequestInput,
};
use crate::AppState;
use shared::ApiResponse;

type IdPath = WithRejection<Path<i32>, AppError>;

fn service(state: AppState) -> PurchaseRequestService {
    PurchaseRequestService::new(state.db, state.hub)
}

/// List purchase requests, newest first
pub async fn list_purchase_requests(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<PurchaseRequest>>>> {
    let requests = service(state).list().await?;
    Ok(Json(ApiResponse::data(requests)))
}

/// Get a purchase request
pub async fn get_purchase_request(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> AppResult<Json<ApiResponse<PurchaseRequest>>> {
    let request = service(state).get(id).await?;
    Ok(Json(ApiResponse::data(request)))
}

/// Create a DRAFT purchase request
pub async fn create_purchase_request(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<CreatePurchaseRequestInput>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<PurchaseRequest>>)> {
    let request = service(state).create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(request))))
}

/// Update a DRAFT purchase request, possibly submitting it
pub async fn update_purchase_request(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(input), _): WithRejection<Json<UpdatePurchaseRequestInput>, AppError>,
) -> AppResult<Json<ApiResponse<PurchaseRequest>>> {
    let request = service(state).update(id, input).await?;
    Ok(Json(ApiResponse::data(request)))
}

/// Delete a DRAFT purchase request
pub async fn delete_purchase_request(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> AppResult<Json<ApiResponse<()>>> {
    service(state).delete(id).await?;
    Ok(Json(ApiResponse::message("Purchase request deleted successfully")))
}
