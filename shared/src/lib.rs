//! Shared types and models for the Inventory Allocation System
//!
//! This crate holds the domain model and the purchase-request workflow rules.
//! It performs no I/O; the backend applies its decisions inside database
//! transactions.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
