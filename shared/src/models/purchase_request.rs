//! Purchase-request models and lifecycle rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ProductSummary, WarehouseSummary};

/// A request to buy stock from a vendor for one warehouse
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub id: i32,
    /// Unique human-readable code (e.g., "PR00001")
    pub reference: String,
    pub warehouse_id: i32,
    pub vendor: String,
    pub status: PurchaseRequestStatus,
    pub warehouse: WarehouseSummary,
    pub items: Vec<PurchaseRequestItem>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl PurchaseRequest {
    /// Total quantity across all items
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity)).sum()
    }
}

/// One product line of a purchase request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurchaseRequestItem {
    pub id: i32,
    pub purchase_request_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub product: ProductSummary,
}

/// Lifecycle state of a purchase request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseRequestStatus {
    /// Being edited; the only state that allows changes or deletion
    Draft,
    /// Submitted to the hub, waiting for delivery
    Pending,
    /// Delivered and reconciled into stock
    Completed,
}

impl PurchaseRequestStatus {
    pub const ALL: [PurchaseRequestStatus; 3] = [
        PurchaseRequestStatus::Draft,
        PurchaseRequestStatus::Pending,
        PurchaseRequestStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseRequestStatus::Draft => "DRAFT",
            PurchaseRequestStatus::Pending => "PENDING",
            PurchaseRequestStatus::Completed => "COMPLETED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(PurchaseRequestStatus::Draft),
            "PENDING" => Some(PurchaseRequestStatus::Pending),
            "COMPLETED" => Some(PurchaseRequestStatus::Completed),
            _ => None,
        }
    }

    /// Warehouse, vendor and items may only change in this state
    pub fn is_editable(&self) -> bool {
        matches!(self, PurchaseRequestStatus::Draft)
    }

    fn rank(&self) -> u8 {
        match self {
            PurchaseRequestStatus::Draft => 0,
            PurchaseRequestStatus::Pending => 1,
            PurchaseRequestStatus::Completed => 2,
        }
    }

    /// Whether `next` is exactly one step forward from this state
    pub fn can_advance_to(&self, next: PurchaseRequestStatus) -> bool {
        next.rank() == self.rank() + 1
    }
}

impl std::fmt::Display for PurchaseRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle rule violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Cannot update purchase request. Only DRAFT status can be modified. Current status: {0}")]
    NotEditable(PurchaseRequestStatus),

    #[error("Cannot delete purchase request. Only DRAFT status can be deleted. Current status: {0}")]
    NotDeletable(PurchaseRequestStatus),

    #[error("Purchase request status must be PENDING. Current status: {0}")]
    NotPending(PurchaseRequestStatus),

    #[error("Cannot change status from {from} to {to}")]
    IllegalTransition {
        from: PurchaseRequestStatus,
        to: PurchaseRequestStatus,
    },
}

/// Outcome of a status field on an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// Stay in DRAFT
    Unchanged,
    /// DRAFT -> PENDING, the hub must be notified after commit
    Submit,
}

/// Outcome of a delivery confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// PENDING: apply stock increments and complete the request
    Apply,
    /// Already COMPLETED: acknowledge without touching stock
    AlreadyProcessed,
}

/// Decide what an update does to the status.
///
/// Updates require DRAFT regardless of the payload. From DRAFT the only
/// forward step an update may take is PENDING; COMPLETED is reserved for
/// webhook reconciliation.
pub fn plan_status_change(
    current: PurchaseRequestStatus,
    requested: Option<PurchaseRequestStatus>,
) -> Result<StatusChange, WorkflowError> {
    if !current.is_editable() {
        return Err(WorkflowError::NotEditable(current));
    }

    match requested {
        None => Ok(StatusChange::Unchanged),
        Some(next) if next == current => Ok(StatusChange::Unchanged),
        Some(next) if current.can_advance_to(next) => Ok(StatusChange::Submit),
        Some(next) => Err(WorkflowError::IllegalTransition { from: current, to: next }),
    }
}

/// Check that a request may be deleted
pub fn ensure_deletable(current: PurchaseRequestStatus) -> Result<(), WorkflowError> {
    if current.is_editable() {
        Ok(())
    } else {
        Err(WorkflowError::NotDeletable(current))
    }
}

/// Decide how a delivery confirmation is handled
pub fn plan_reconciliation(
    current: PurchaseRequestStatus,
) -> Result<Reconciliation, WorkflowError> {
    match current {
        PurchaseRequestStatus::Completed => Ok(Reconciliation::AlreadyProcessed),
        PurchaseRequestStatus::Pending => Ok(Reconciliation::Apply),
        other => Err(WorkflowError::NotPending(other)),
    }
}
