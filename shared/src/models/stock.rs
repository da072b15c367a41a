//! Stock levels and delivery aggregation

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProductSummary, WarehouseSummary};

/// Quantity of one product held in one warehouse
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stock {
    pub id: i32,
    pub warehouse_id: i32,
    pub product_id: i32,
    pub quantity: i64,
    pub warehouse: WarehouseSummary,
    pub product: ProductSummary,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// A delivered line reported by the hub
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryLine {
    pub product_id: i32,
    pub quantity: i32,
}

/// Sum delivered quantities per product.
///
/// Lines for the same product accumulate, so `[{1, 3}, {1, 2}]` becomes a
/// single increment of 5 for product 1. Output is ordered by product id so
/// stock rows are always locked in the same order.
pub fn aggregate_delivery(lines: &[DeliveryLine]) -> BTreeMap<i32, i64> {
    let mut totals = BTreeMap::new();
    for line in lines {
        *totals.entry(line.product_id).or_insert(0i64) += i64::from(line.quantity);
    }
    totals
}
