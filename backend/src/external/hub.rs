//! Purchasing hub client
//!
//! Notifies the external hub when a purchase request is submitted. The hub
//! later confirms delivery through the receive-stock webhook.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::config::HubConfig;
use crate::error::{AppError, AppResult};
use crate::models::PurchaseRequest;

/// Path of the purchase endpoint relative to the hub base URL
const PURCHASE_PATH: &str = "/api/request/purchase";

/// Client for the purchasing hub
#[derive(Clone)]
pub struct HubClient {
    base_url: String,
    secret_key: String,
    http_client: Client,
}

/// Body of a purchase notification
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HubPurchasePayload {
    pub vendor: String,
    pub reference: String,
    pub qty_total: i64,
    pub details: Vec<HubPurchaseDetail>,
}

/// One product line of a purchase notification
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HubPurchaseDetail {
    pub product_name: String,
    pub sku_barcode: String,
    pub qty: i32,
}

impl From<&PurchaseRequest> for HubPurchasePayload {
    fn from(request: &PurchaseRequest) -> Self {
        HubPurchasePayload {
            vendor: request.vendor.clone(),
            reference: request.reference.clone(),
            qty_total: request.total_quantity(),
            details: request
                .items
                .iter()
                .map(|item| HubPurchaseDetail {
                    product_name: item.product.name.clone(),
                    sku_barcode: item.product.sku.clone(),
                    qty: item.quantity,
                })
                .collect(),
        }
    }
}

impl HubClient {
    /// Create a new hub client
    pub fn new(base_url: String, secret_key: String, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key,
            http_client,
        })
    }

    /// Create a client from the hub section of the configuration
    pub fn from_config(config: &HubConfig) -> AppResult<Self> {
        Self::new(
            config.base_url.clone(),
            config.secret_key.clone(),
            Duration::from_millis(config.timeout_ms),
        )
    }

    fn purchase_url(&self) -> String {
        format!("{}{}", self.base_url, PURCHASE_PATH)
    }

    /// Send a submitted purchase request to the hub
    pub async fn notify_purchase_request(
        &self,
        request: &PurchaseRequest,
    ) -> AppResult<serde_json::Value> {
        let payload = HubPurchasePayload::from(request);

        let response = self
            .http_client
            .post(self.purchase_url())
            .header("secret-key", &self.secret_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::ExternalCall(format!("Failed to notify hub: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalCall(format!(
                "Failed to notify hub: Hub API returned status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let body = response.text().await.map_err(|e| {
            AppError::ExternalCall(format!("Failed to notify hub: unreadable response: {}", e))
        })?;
        // The hub acknowledges with JSON; keep plain-text acknowledgements as-is
        let result = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));

        tracing::debug!("Hub API response for {}: {}", request.reference, result);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::{
        ProductSummary, PurchaseRequestItem, PurchaseRequestStatus, WarehouseSummary,
    };

    fn item(id: i32, name: &str, sku: &str, quantity: i32) -> PurchaseRequestItem {
        PurchaseRequestItem {
            id,
            purchase_request_id: 1,
            product_id: id,
            quantity,
            product: ProductSummary {
                id,
                name: name.to_string(),
                sku: sku.to_string(),
            },
        }
    }

    fn request() -> PurchaseRequest {
        PurchaseRequest {
            id: 1,
            reference: "PR00001".to_string(),
            warehouse_id: 1,
            vendor: "PT Sumber Rasa".to_string(),
            status: PurchaseRequestStatus::Pending,
            warehouse: WarehouseSummary {
                id: 1,
                name: "Jakarta Warehouse".to_string(),
            },
            items: vec![item(1, "Icy Mint", "ICYMINT", 10), item(2, "Choco Fudge", "CHOCOFUDGE", 5)],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_payload_from_request() {
        let payload = HubPurchasePayload::from(&request());
        assert_eq!(payload.vendor, "PT Sumber Rasa");
        assert_eq!(payload.reference, "PR00001");
        assert_eq!(payload.qty_total, 15);
        assert_eq!(payload.details.len(), 2);
        assert_eq!(payload.details[1].sku_barcode, "CHOCOFUDGE");
    }

    #[test]
    fn test_payload_wire_format() {
        let json = serde_json::to_value(HubPurchasePayload::from(&request())).unwrap();
        assert_eq!(
            json["details"][0],
            serde_json::json!({ "product_name": "Icy Mint", "sku_barcode": "ICYMINT", "qty": 10 })
        );
        assert_eq!(json["qty_total"], 15);
    }

    #[test]
    fn test_purchase_url_strips_trailing_slash() {
        let client = HubClient::new(
            "https://hub.example.com/".to_string(),
            "secret".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.purchase_url(), "https://hub.example.com/api/request/purchase");
    }
}
