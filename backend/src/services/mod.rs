//! Business logic services for the Inventory Allocation System

pub mod catalog;
pub mod purchase_request;
pub mod reference;
pub mod stock;
pub mod webhook;

pub use catalog::CatalogService;
pub use purchase_request::PurchaseRequestService;
pub use stock::StockService;
pub use webhook::WebhookService;
