//! Database models for the Inventory Allocation System
//!
//! Re-exports models from the shared crate and adds backend-specific request
//! payloads and validator glue.

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError};

pub use shared::models::*;

use crate::error::{AppError, AppResult};

/// A `{product_id, quantity}` line as sent by clients and by the hub
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct LineItemInput {
    #[serde(default)]
    #[validate(range(min = 1, message = "is required"))]
    pub product_id: i32,
    #[serde(default)]
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub quantity: i32,
}

impl From<LineItemInput> for DeliveryLine {
    fn from(line: LineItemInput) -> Self {
        DeliveryLine {
            product_id: line.product_id,
            quantity: line.quantity,
        }
    }
}

/// Validate a non-empty list of lines, reporting the first bad field as
/// `items[i].<field>`.
pub fn validate_line_items(items: &[LineItemInput]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::validation("items", "must be a non-empty array"));
    }
    for (idx, item) in items.iter().enumerate() {
        if let Err(errors) = item.validate() {
            return Err(match AppError::from(errors) {
                AppError::Validation { field, message } => {
                    AppError::validation(format!("items[{}].{}", idx, field), message)
                }
                other => other,
            });
        }
    }
    Ok(())
}

fn to_validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// `validator` adapter for [`shared::validate_name`]
pub fn validate_name_field(value: &str) -> Result<(), ValidationError> {
    shared::validate_name(value).map_err(|m| to_validation_error("name", m))
}

/// `validator` adapter for [`shared::validate_sku`]
pub fn validate_sku_field(value: &str) -> Result<(), ValidationError> {
    shared::validate_sku(value).map_err(|m| to_validation_error("sku", m))
}

/// `validator` adapter for [`shared::validate_not_blank`]
pub fn validate_not_blank_field(value: &str) -> Result<(), ValidationError> {
    shared::validate_not_blank(value).map_err(|m| to_validation_error("not_blank", m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i32, quantity: i32) -> LineItemInput {
        LineItemInput {
            product_id,
            quantity,
        }
    }

    fn field_of(err: AppError) -> String {
        match err {
            AppError::Validation { field, .. } => field,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_items_rejected() {
        assert_eq!(field_of(validate_line_items(&[]).unwrap_err()), "items");
    }

    #[test]
    fn test_bad_quantity_reports_index() {
        let err = validate_line_items(&[line(1, 2), line(3, 0)]).unwrap_err();
        match err {
            AppError::Validation { field, message } => {
                assert_eq!(field, "items[1].quantity");
                assert_eq!(message, "must be greater than 0");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_product_reports_index() {
        let err = validate_line_items(&[line(0, 2)]).unwrap_err();
        assert_eq!(field_of(err), "items[0].product_id");
    }

    #[test]
    fn test_valid_items() {
        assert!(validate_line_items(&[line(1, 1), line(1, 5)]).is_ok());
    }

    #[test]
    fn test_name_adapter_message() {
        let err = validate_name_field("  ").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("must not be empty"));
    }
}
