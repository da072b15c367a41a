//! Purchase-request reference codes

/// Prefix of every purchase-request reference
pub const REFERENCE_PREFIX: &str = "PR";

/// Minimum number of digits after the prefix
pub const REFERENCE_DIGITS: usize = 5;

/// Format a sequence value as a reference (e.g., 1 -> "PR00001").
///
/// Values wider than five digits are not truncated, so the mapping stays
/// injective: 123456 -> "PR123456".
pub fn format_reference(sequence: i64) -> String {
    format!("{}{:0width$}", REFERENCE_PREFIX, sequence, width = REFERENCE_DIGITS)
}

/// Parse a reference back into its sequence value
pub fn parse_reference(reference: &str) -> Option<i64> {
    let digits = reference.strip_prefix(REFERENCE_PREFIX)?;
    if digits.len() < REFERENCE_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    // Reject non-canonical forms such as "PR000001"
    if format_reference(value) != reference {
        return None;
    }
    Some(value)
}

/// Check whether a string is a well-formed reference
pub fn is_valid_reference(reference: &str) -> bool {
    parse_reference(reference).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_five_digits() {
        assert_eq!(format_reference(1), "PR00001");
        assert_eq!(format_reference(42), "PR00042");
        assert_eq!(format_reference(99999), "PR99999");
    }

    #[test]
    fn test_format_grows_past_five_digits() {
        assert_eq!(format_reference(100000), "PR100000");
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse_reference("PR00001"), Some(1));
        assert_eq!(parse_reference("PR100000"), Some(100000));
        assert_eq!(parse_reference("PR1"), None);
        assert_eq!(parse_reference("PO00001"), None);
        assert_eq!(parse_reference("PR0000A"), None);
        assert_eq!(parse_reference("PR000001"), None);
        assert_eq!(parse_reference(""), None);
    }
}
