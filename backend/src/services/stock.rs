//! Stock level queries and increments

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::error::AppResult;
use crate::models::{ProductSummary, Stock, WarehouseSummary};

/// Stock service for reading stock levels
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Optional filters for listing stock
#[derive(Debug, Default, Deserialize)]
pub struct StockFilter {
    pub warehouse_id: Option<i32>,
    pub product_id: Option<i32>,
}

#[derive(Debug, FromRow)]
struct StockRow {
    id: i32,
    warehouse_id: i32,
    product_id: i32,
    quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    warehouse_name: String,
    product_name: String,
    product_sku: String,
}

impl From<StockRow> for Stock {
    fn from(r: StockRow) -> Self {
        Stock {
            id: r.id,
            warehouse_id: r.warehouse_id,
            product_id: r.product_id,
            quantity: r.quantity,
            warehouse: WarehouseSummary {
                id: r.warehouse_id,
                name: r.warehouse_name,
            },
            product: ProductSummary {
                id: r.product_id,
                name: r.product_name,
                sku: r.product_sku,
            },
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List stock rows with warehouse and product details, ordered by id
    pub async fn list_stocks(&self, filter: StockFilter) -> AppResult<Vec<Stock>> {
        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT s.id, s.warehouse_id, s.product_id, s.quantity, s.created_at, s.updated_at,
                   w.name AS warehouse_name, p.name AS product_name, p.sku AS product_sku
            FROM stocks s
            JOIN warehouses w ON w.id = s.warehouse_id
            JOIN products p ON p.id = s.product_id
            WHERE ($1::INTEGER IS NULL OR s.warehouse_id = $1)
              AND ($2::INTEGER IS NULL OR s.product_id = $2)
            ORDER BY s.id ASC
            "#,
        )
        .bind(filter.warehouse_id)
        .bind(filter.product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Add delivered quantities to a warehouse's stock.
///
/// Missing (warehouse, product) rows are created at zero and incremented in
/// the same statement. Runs on the caller's transaction.
pub async fn increment_stock(
    conn: &mut PgConnection,
    warehouse_id: i32,
    totals: &BTreeMap<i32, i64>,
) -> AppResult<()> {
    for (product_id, quantity) in totals {
        sqlx::query(
            r#"
            INSERT INTO stocks (warehouse_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (warehouse_id, product_id)
            DO UPDATE SET quantity = stocks.quantity + EXCLUDED.quantity, updated_at = NOW()
            "#,
        )
        .bind(warehouse_id)
        .bind(*product_id)
        .bind(*quantity)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}
