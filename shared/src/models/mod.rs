//! Domain models for the Inventory Allocation System

mod catalog;
mod purchase_request;
mod reference;
mod stock;

pub use catalog::*;
pub use purchase_request::*;
pub use reference::*;
pub use stock::*;
