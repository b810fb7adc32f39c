use crate::error::{AjoError, AjoResult};

/// Validates that a string is not blank (empty or whitespace-only).
/// Returns the trimmed string on success.
pub fn non_blank(value: &str, field: &str) -> AjoResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        Err(AjoError::BlankField {
            field: field.to_string(),
        })
    } else {
        Ok(trimmed)
    }
}

/// Validates that a monetary amount is positive (> 0).
pub fn positive_amount(value: i64, field: &str) -> AjoResult<i64> {
    if value <= 0 {
        Err(AjoError::NonPositive {
            field: field.to_string(),
        })
    } else {
        Ok(value)
    }
}

/// Validates that a count (weeks, members, positions) is positive (> 0).
pub fn positive_count(value: i32, field: &str) -> AjoResult<i32> {
    if value <= 0 {
        Err(AjoError::NonPositive {
            field: field.to_string(),
        })
    } else {
        Ok(value)
    }
}

/// Validates an optional count (None is valid, Some(n) must be positive).
pub fn optional_positive(value: Option<i32>, field: &str) -> AjoResult<Option<i32>> {
    match value {
        None => Ok(None),
        Some(n) => positive_count(n, field).map(Some),
    }
}

/// Trims an optional string, returning None if blank.
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_accepts_valid_string() {
        assert_eq!(non_blank("ajo squad", "name").unwrap(), "ajo squad");
    }

    #[test]
    fn non_blank_trims_whitespace() {
        assert_eq!(non_blank("  ajo squad  ", "name").unwrap(), "ajo squad");
    }

    #[test]
    fn non_blank_rejects_empty() {
        assert!(non_blank("", "name").is_err());
    }

    #[test]
    fn non_blank_rejects_whitespace_only() {
        assert!(non_blank("   ", "name").is_err());
    }

    #[test]
    fn positive_amount_accepts_positive() {
        assert_eq!(positive_amount(5000, "amount").unwrap(), 5000);
    }

    #[test]
    fn positive_amount_rejects_zero() {
        assert!(positive_amount(0, "amount").is_err());
    }

    #[test]
    fn positive_amount_rejects_negative() {
        assert!(positive_amount(-100, "amount").is_err());
    }

    #[test]
    fn positive_count_rejects_zero() {
        assert!(positive_count(0, "max_members").is_err());
    }

    #[test]
    fn optional_positive_accepts_none() {
        assert_eq!(optional_positive(None, "expected").unwrap(), None);
    }

    #[test]
    fn optional_positive_accepts_positive() {
        assert_eq!(optional_positive(Some(6), "expected").unwrap(), Some(6));
    }

    #[test]
    fn optional_positive_rejects_zero() {
        assert!(optional_positive(Some(0), "expected").is_err());
    }

    #[test]
    fn trim_optional_trims() {
        assert_eq!(trim_optional(Some("  rent  ")), Some("rent".to_string()));
    }

    #[test]
    fn trim_optional_returns_none_for_blank() {
        assert_eq!(trim_optional(Some("   ")), None);
    }

    #[test]
    fn trim_optional_returns_none_for_none() {
        assert_eq!(trim_optional(None), None);
    }
}
