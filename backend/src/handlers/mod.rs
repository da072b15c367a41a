//! HTTP handlers for the Inventory Allocation System API

pub mod catalog;
pub mod health;
pub mod purchase_request;
pub mod stock;
pub mod webhook;

pub use catalog::{create_product, list_products, list_warehouses};
pub use health::{health_check, route_not_found};
pub use purchase_request::{
    create_purchase_request, delete_purchase_request, get_purchase_request,
    list_purchase_requests, update_purchase_request,
};
pub use stock::list_stocks;
pub use webhook::receive_stock;
