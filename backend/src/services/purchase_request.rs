//! Purchase-request workflow service
//!
//! Requests are created as DRAFT, edited while DRAFT, submitted to the hub as
//! PENDING, and completed only by webhook reconciliation. Each operation runs
//! in one transaction; rows being changed are locked with `FOR UPDATE`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgConnection, PgPool};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::external::HubClient;
use crate::models::{
    ensure_deletable, plan_status_change, validate_line_items, validate_name_field,
    LineItemInput, ProductSummary, PurchaseRequest, PurchaseRequestItem, PurchaseRequestStatus,
    StatusChange, WarehouseSummary,
};
use crate::services::catalog::{ensure_products_exist, ensure_warehouse_exists};
use crate::services::reference::next_reference;

/// Purchase-request service
#[derive(Clone)]
pub struct PurchaseRequestService {
    db: PgPool,
    hub: HubClient,
}

/// Input for creating a purchase request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePurchaseRequestInput {
    #[serde(default)]
    #[validate(range(min = 1, message = "is required"))]
    pub warehouse_id: i32,
    #[serde(default)]
    #[validate(custom = "validate_name_field")]
    pub vendor: String,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
}

/// Input for updating a DRAFT purchase request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePurchaseRequestInput {
    #[validate(range(min = 1, message = "is required"))]
    pub warehouse_id: Option<i32>,
    #[validate(custom = "validate_name_field")]
    pub vendor: Option<String>,
    pub status: Option<String>,
    /// Replaces the whole item set when present
    pub items: Option<Vec<LineItemInput>>,
}

impl UpdatePurchaseRequestInput {
    fn is_empty(&self) -> bool {
        self.warehouse_id.is_none()
            && self.vendor.is_none()
            && self.status.is_none()
            && self.items.is_none()
    }

    fn requested_status(&self) -> AppResult<Option<PurchaseRequestStatus>> {
        match self.status.as_deref() {
            None => Ok(None),
            Some(s) => PurchaseRequestStatus::from_str(s).map(Some).ok_or_else(|| {
                AppError::validation("status", "must be one of: DRAFT, PENDING, COMPLETED")
            }),
        }
    }
}

/// Purchase request header joined with its warehouse
#[derive(Debug, FromRow)]
struct RequestRow {
    id: i32,
    reference: String,
    warehouse_id: i32,
    vendor: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    warehouse_name: String,
}

/// Item joined with its product
#[derive(Debug, FromRow)]
struct ItemRow {
    id: i32,
    purchase_request_id: i32,
    product_id: i32,
    quantity: i32,
    product_name: String,
    product_sku: String,
}

impl From<ItemRow> for PurchaseRequestItem {
    fn from(r: ItemRow) -> Self {
        PurchaseRequestItem {
            id: r.id,
            purchase_request_id: r.purchase_request_id,
            product_id: r.product_id,
            quantity: r.quantity,
            product: ProductSummary {
                id: r.product_id,
                name: r.product_name,
                sku: r.product_sku,
            },
        }
    }
}

/// A purchase request row held under `FOR UPDATE`
#[derive(Debug, Clone)]
pub(crate) struct LockedRequest {
    pub id: i32,
    pub reference: String,
    pub warehouse_id: i32,
    pub status: PurchaseRequestStatus,
}

#[derive(Debug, FromRow)]
struct LockedRow {
    id: i32,
    reference: String,
    warehouse_id: i32,
    status: String,
}

pub(crate) fn parse_status(s: &str) -> AppResult<PurchaseRequestStatus> {
    PurchaseRequestStatus::from_str(s)
        .ok_or_else(|| AppError::Internal(format!("Unknown purchase request status {}", s)))
}

impl TryFrom<LockedRow> for LockedRequest {
    type Error = AppError;

    fn try_from(r: LockedRow) -> AppResult<Self> {
        Ok(LockedRequest {
            status: parse_status(&r.status)?,
            id: r.id,
            reference: r.reference,
            warehouse_id: r.warehouse_id,
        })
    }
}

fn hydrate(row: RequestRow, items: Vec<PurchaseRequestItem>) -> AppResult<PurchaseRequest> {
    Ok(PurchaseRequest {
        status: parse_status(&row.status)?,
        id: row.id,
        reference: row.reference,
        warehouse_id: row.warehouse_id,
        vendor: row.vendor,
        warehouse: WarehouseSummary {
            id: row.warehouse_id,
            name: row.warehouse_name,
        },
        items,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

const REQUEST_COLUMNS: &str = r#"
    SELECT pr.id, pr.reference, pr.warehouse_id, pr.vendor, pr.status,
           pr.created_at, pr.updated_at, w.name AS warehouse_name
    FROM purchase_requests pr
    JOIN warehouses w ON w.id = pr.warehouse_id
"#;

const ITEM_COLUMNS: &str = r#"
    SELECT i.id, i.purchase_request_id, i.product_id, i.quantity,
           p.name AS product_name, p.sku AS product_sku
    FROM purchase_request_items i
    JOIN products p ON p.id = i.product_id
"#;

/// Lock a purchase request by id
pub(crate) async fn lock_request(
    conn: &mut PgConnection,
    id: i32,
) -> AppResult<Option<LockedRequest>> {
    let row = sqlx::query_as::<_, LockedRow>(
        "SELECT id, reference, warehouse_id, status FROM purchase_requests WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(LockedRequest::try_from).transpose()
}

/// Lock a purchase request by reference
pub(crate) async fn lock_request_by_reference(
    conn: &mut PgConnection,
    reference: &str,
) -> AppResult<Option<LockedRequest>> {
    let row = sqlx::query_as::<_, LockedRow>(
        "SELECT id, reference, warehouse_id, status FROM purchase_requests WHERE reference = $1 FOR UPDATE",
    )
    .bind(reference)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(LockedRequest::try_from).transpose()
}

/// Set the status of a locked request
pub(crate) async fn set_status(
    conn: &mut PgConnection,
    id: i32,
    status: PurchaseRequestStatus,
) -> AppResult<()> {
    sqlx::query("UPDATE purchase_requests SET status = $1, updated_at = NOW() WHERE id = $2")
        .bind(status.as_str())
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn insert_items(
    conn: &mut PgConnection,
    purchase_request_id: i32,
    items: &[LineItemInput],
) -> AppResult<()> {
    for item in items {
        sqlx::query(
            r#"
            INSERT INTO purchase_request_items (purchase_request_id, product_id, quantity)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(purchase_request_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

fn product_ids(items: &[LineItemInput]) -> Vec<i32> {
    items.iter().map(|i| i.product_id).collect()
}

impl PurchaseRequestService {
    /// Create a new PurchaseRequestService instance
    pub fn new(db: PgPool, hub: HubClient) -> Self {
        Self { db, hub }
    }

    /// Create a DRAFT purchase request with its items
    pub async fn create(&self, input: CreatePurchaseRequestInput) -> AppResult<PurchaseRequest> {
        input.validate()?;
        validate_line_items(&input.items)?;

        let mut tx = self.db.begin().await?;

        ensure_warehouse_exists(&mut tx, input.warehouse_id).await?;
        ensure_products_exist(&mut tx, &product_ids(&input.items)).await?;

        let reference = next_reference(&mut tx).await?;

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO purchase_requests (reference, warehouse_id, vendor, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&reference)
        .bind(input.warehouse_id)
        .bind(input.vendor.trim())
        .bind(PurchaseRequestStatus::Draft.as_str())
        .fetch_one(&mut *tx)
        .await?;

        insert_items(&mut tx, id, &input.items).await?;

        tx.commit().await?;

        tracing::info!(
            "Created purchase request {} ({}) with {} items",
            reference,
            id,
            input.items.len()
        );

        self.get(id).await
    }

    /// List purchase requests, newest first
    pub async fn list(&self) -> AppResult<Vec<PurchaseRequest>> {
        let rows = sqlx::query_as::<_, RequestRow>(&format!("{} ORDER BY pr.id DESC", REQUEST_COLUMNS))
            .fetch_all(&self.db)
            .await?;

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let item_rows = sqlx::query_as::<_, ItemRow>(&format!(
            "{} WHERE i.purchase_request_id = ANY($1) ORDER BY i.id ASC",
            ITEM_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        let mut items_by_request: HashMap<i32, Vec<PurchaseRequestItem>> = HashMap::new();
        for item in item_rows {
            items_by_request
                .entry(item.purchase_request_id)
                .or_default()
                .push(item.into());
        }

        rows.into_iter()
            .map(|row| {
                let items = items_by_request.remove(&row.id).unwrap_or_default();
                hydrate(row, items)
            })
            .collect()
    }

    /// Get a purchase request with warehouse and item details
    pub async fn get(&self, id: i32) -> AppResult<PurchaseRequest> {
        let row = sqlx::query_as::<_, RequestRow>(&format!("{} WHERE pr.id = $1", REQUEST_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Purchase request".to_string()))?;

        let items = sqlx::query_as::<_, ItemRow>(&format!(
            "{} WHERE i.purchase_request_id = $1 ORDER BY i.id ASC",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        hydrate(row, items.into_iter().map(Into::into).collect())
    }

    /// Update a DRAFT purchase request.
    ///
    /// Moving to PENDING commits first and then notifies the hub. If the hub
    /// call fails the request stays PENDING and the failure is returned as
    /// [`AppError::ExternalCall`].
    pub async fn update(
        &self,
        id: i32,
        input: UpdatePurchaseRequestInput,
    ) -> AppResult<PurchaseRequest> {
        if input.is_empty() {
            return Err(AppError::ValidationError(
                "request body cannot be empty".to_string(),
            ));
        }
        input.validate()?;
        let requested = input.requested_status()?;
        if let Some(items) = &input.items {
            validate_line_items(items)?;
        }

        let mut tx = self.db.begin().await?;

        let current = lock_request(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Purchase request".to_string()))?;

        let change = plan_status_change(current.status, requested)?;

        if let Some(warehouse_id) = input.warehouse_id {
            ensure_warehouse_exists(&mut tx, warehouse_id).await?;
        }

        if let Some(items) = &input.items {
            ensure_products_exist(&mut tx, &product_ids(items)).await?;

            sqlx::query("DELETE FROM purchase_request_items WHERE purchase_request_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            insert_items(&mut tx, id, items).await?;
        }

        let status = match change {
            StatusChange::Unchanged => current.status,
            StatusChange::Submit => PurchaseRequestStatus::Pending,
        };

        sqlx::query(
            r#"
            UPDATE purchase_requests
            SET warehouse_id = COALESCE($1, warehouse_id),
                vendor = COALESCE($2, vendor),
                status = $3,
                updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(input.warehouse_id)
        .bind(input.vendor.as_deref().map(str::trim))
        .bind(status.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let request = self.get(id).await?;

        if change == StatusChange::Submit {
            tracing::info!("Purchase request {} submitted, notifying hub", request.reference);

            if let Err(e) = self.hub.notify_purchase_request(&request).await {
                tracing::error!(
                    "Hub notification failed for {} (status stays PENDING): {}",
                    request.reference,
                    e
                );
                return Err(match e {
                    AppError::ExternalCall(msg) => AppError::ExternalCall(format!(
                        "Purchase request {} is PENDING but the hub was not notified. {}",
                        request.reference, msg
                    )),
                    other => other,
                });
            }
        }

        Ok(request)
    }

    /// Delete a DRAFT purchase request and its items
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let current = lock_request(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Purchase request".to_string()))?;

        ensure_deletable(current.status)?;

        sqlx::query("DELETE FROM purchase_request_items WHERE purchase_request_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM purchase_requests WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Deleted purchase request {}", current.reference);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_detected() {
        assert!(UpdatePurchaseRequestInput::default().is_empty());
        let input = UpdatePurchaseRequestInput {
            vendor: Some("Acme".to_string()),
            ..Default::default()
        };
        assert!(!input.is_empty());
    }

    #[test]
    fn test_requested_status_parsing() {
        let input = UpdatePurchaseRequestInput {
            status: Some("PENDING".to_string()),
            ..Default::default()
        };
        assert_eq!(input.requested_status().unwrap(), Some(PurchaseRequestStatus::Pending));

        let input = UpdatePurchaseRequestInput {
            status: Some("SHIPPED".to_string()),
            ..Default::default()
        };
        let err = input.requested_status().unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "status"));
    }

    #[test]
    fn test_update_rejects_blank_vendor() {
        let input = UpdatePurchaseRequestInput {
            vendor: Some("   ".to_string()),
            ..Default::default()
        };
        let err = AppError::from(input.validate().unwrap_err());
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "vendor"));
    }

    #[test]
    fn test_create_input_defaults_missing_fields() {
        let input: CreatePurchaseRequestInput =
            serde_json::from_value(serde_json::json!({ "vendor": "Acme" })).unwrap();
        assert_eq!(input.warehouse_id, 0);
        assert!(input.items.is_empty());
        let err = AppError::from(input.validate().unwrap_err());
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "warehouse_id"));
    }
}
