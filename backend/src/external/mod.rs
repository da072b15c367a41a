//! External API integrations

pub mod hub;

pub use hub::HubClient;
