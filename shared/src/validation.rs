//! Field validation utilities for the Inventory Allocation System

/// Maximum length of free-text names (vendor, product name)
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length of a SKU
pub const MAX_SKU_LENGTH: usize = 64;

/// Validate that a required text field has visible content
pub fn validate_not_blank(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("must not be empty");
    }
    Ok(())
}

/// Validate a vendor or product name
pub fn validate_name(value: &str) -> Result<(), &'static str> {
    validate_not_blank(value)?;
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err("must be at most 255 characters");
    }
    Ok(())
}

/// Validate SKU format (1-64 characters, no whitespace)
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.is_empty() {
        return Err("must not be empty");
    }
    if sku.len() > MAX_SKU_LENGTH {
        return Err("must be at most 64 characters");
    }
    if sku.chars().any(char::is_whitespace) {
        return Err("must not contain whitespace");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Acme").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_name_length() {
        assert!(validate_name(&"a".repeat(255)).is_ok());
        assert!(validate_name(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_sku() {
        assert!(validate_sku("ICYMINT").is_ok());
        assert!(validate_sku("CHOCO-FUDGE_01").is_ok());
        assert!(validate_sku("").is_err());
        assert!(validate_sku("ICY MINT").is_err());
        assert!(validate_sku(&"X".repeat(65)).is_err());
    }

    proptest! {
        #[test]
        fn prop_sku_without_whitespace_accepted(sku in "[A-Z0-9_-]{1,64}") {
            prop_assert!(validate_sku(&sku).is_ok());
        }

        #[test]
        fn prop_blank_names_rejected(padding in "[ \t\n]{0,20}") {
            prop_assert!(validate_name(&padding).is_err());
        }
    }
}
