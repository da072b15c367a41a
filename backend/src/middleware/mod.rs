//! Request middleware

pub mod signature;

pub use signature::verify_hub_signature;
