//! Product and warehouse reference data

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgConnection, PgPool};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{validate_name_field, validate_sku_field, Product, Warehouse};

/// Catalog service for products and warehouses
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

/// Input for creating a product
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductInput {
    #[serde(default)]
    #[validate(custom = "validate_name_field")]
    pub name: String,
    #[serde(default)]
    #[validate(custom = "validate_sku_field")]
    pub sku: String,
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    sku: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            name: r.name,
            sku: r.sku,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct WarehouseRow {
    id: i32,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<WarehouseRow> for Warehouse {
    fn from(r: WarehouseRow) -> Self {
        Warehouse {
            id: r.id,
            name: r.name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all products by id
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, sku, created_at, updated_at FROM products ORDER BY id ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a product with a unique SKU
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        input.validate()?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, sku)
            VALUES ($1, $2)
            RETURNING id, name, sku, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.sku)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::DuplicateEntry("sku".to_string())
            }
            other => AppError::DatabaseError(other),
        })?;

        tracing::info!("Created product {} ({})", row.id, row.sku);

        Ok(row.into())
    }

    /// List all warehouses by id
    pub async fn list_warehouses(&self) -> AppResult<Vec<Warehouse>> {
        let rows = sqlx::query_as::<_, WarehouseRow>(
            "SELECT id, name, created_at, updated_at FROM warehouses ORDER BY id ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Fail with NotFound unless the warehouse exists
pub async fn ensure_warehouse_exists(conn: &mut PgConnection, warehouse_id: i32) -> AppResult<()> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM warehouses WHERE id = $1)")
        .bind(warehouse_id)
        .fetch_one(&mut *conn)
        .await?;

    if !exists {
        return Err(AppError::NotFound("Warehouse".to_string()));
    }
    Ok(())
}

/// Fail with NotFound naming the first product id (in input order) that does
/// not exist
pub async fn ensure_products_exist(conn: &mut PgConnection, product_ids: &[i32]) -> AppResult<()> {
    let found: Vec<i32> = sqlx::query_scalar("SELECT id FROM products WHERE id = ANY($1)")
        .bind(product_ids)
        .fetch_all(&mut *conn)
        .await?;

    match product_ids.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(AppError::NotFound(format!("Product with id {}", missing))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_product_validation() {
        let valid = CreateProductInput {
            name: "Mango Tango".to_string(),
            sku: "MANGOTANGO".to_string(),
        };
        assert!(valid.validate().is_ok());

        let blank_name = CreateProductInput {
            name: " ".to_string(),
            sku: "MANGOTANGO".to_string(),
        };
        let err = AppError::from(blank_name.validate().unwrap_err());
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "name"));

        let spaced_sku = CreateProductInput {
            name: "Mango Tango".to_string(),
            sku: "MANGO TANGO".to_string(),
        };
        let err = AppError::from(spaced_sku.validate().unwrap_err());
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "sku"));
    }
}
