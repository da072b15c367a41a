//! Stock reconciliation for hub delivery confirmations

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{
    aggregate_delivery, is_valid_reference, plan_reconciliation, validate_line_items,
    validate_not_blank_field, DeliveryLine, LineItemInput, PurchaseRequestStatus, Reconciliation,
};
use crate::services::catalog::ensure_products_exist;
use crate::services::purchase_request::{lock_request_by_reference, set_status};
use crate::services::stock::increment_stock;

/// Webhook service applying deliveries to stock
#[derive(Clone)]
pub struct WebhookService {
    db: PgPool,
}

/// Delivery confirmation sent by the hub
#[derive(Debug, Deserialize, Validate)]
pub struct ReceiveStockInput {
    #[serde(default)]
    #[validate(custom = "validate_not_blank_field")]
    pub reference: String,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
}

/// Outcome of a delivery confirmation
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReceiveStockResult {
    pub reference: String,
    pub status: PurchaseRequestStatus,
    #[serde(rename = "alreadyProcessed")]
    pub already_processed: bool,
}

impl ReceiveStockResult {
    pub fn message(&self) -> &'static str {
        if self.already_processed {
            "Stock already received for this purchase request"
        } else {
            "Stock received successfully"
        }
    }
}

impl WebhookService {
    /// Create a new WebhookService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply a delivery to the request's warehouse and complete the request.
    ///
    /// The request row is locked for the whole transaction, so a duplicate
    /// delivery waits for the first one and then sees COMPLETED.
    pub async fn receive_stock(&self, input: ReceiveStockInput) -> AppResult<ReceiveStockResult> {
        input.validate()?;
        validate_line_items(&input.items)?;

        let reference = input.reference.trim();
        if !is_valid_reference(reference) {
            tracing::warn!("Receive-stock for unrecognised reference format {:?}", reference);
        }

        let mut tx = self.db.begin().await?;

        let request = lock_request_by_reference(&mut tx, reference)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Purchase request with reference {}", reference))
            })?;

        match plan_reconciliation(request.status)? {
            Reconciliation::AlreadyProcessed => {
                tracing::info!("Delivery for {} already processed, skipping", request.reference);
                return Ok(ReceiveStockResult {
                    reference: request.reference,
                    status: request.status,
                    already_processed: true,
                });
            }
            Reconciliation::Apply => {}
        }

        let lines: Vec<DeliveryLine> = input.items.iter().copied().map(Into::into).collect();
        let totals = aggregate_delivery(&lines);
        let product_ids: Vec<i32> = totals.keys().copied().collect();

        ensure_products_exist(&mut tx, &product_ids).await?;
        increment_stock(&mut tx, request.warehouse_id, &totals).await?;
        set_status(&mut tx, request.id, PurchaseRequestStatus::Completed).await?;

        tx.commit().await?;

        tracing::info!(
            "Received stock for {} into warehouse {}: {} products",
            request.reference,
            request.warehouse_id,
            totals.len()
        );

        Ok(ReceiveStockResult {
            reference: request.reference,
            status: PurchaseRequestStatus::Completed,
            already_processed: false,
        })
    }
}
