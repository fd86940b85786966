/// Field-level validation for form input
///
/// Validators are pure functions over raw input. Callers run them before any
/// network call, so invalid submissions never reach the backend.
use thiserror::Error;

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Parse a mobile number; it must be exactly 10 digits
pub fn parse_mobile_number(input: &str) -> Result<u64, ValidationError> {
    let trimmed = input.trim();
    if trimmed.len() != 10 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new(
            "mobileNumber",
            "Mobile number must be 10 digits.",
        ));
    }
    let value: u64 = trimmed.parse().map_err(|_| {
        ValidationError::new("mobileNumber", "Mobile number must be 10 digits.")
    })?;
    validate_mobile_value(value)?;
    Ok(value)
}

/// Check an already-numeric mobile number for the 10-digit rule
pub fn validate_mobile_value(value: u64) -> Result<(), ValidationError> {
    if !(1_000_000_000..=9_999_999_999).contains(&value) {
        return Err(ValidationError::new(
            "mobileNumber",
            "Mobile number must be 10 digits.",
        ));
    }
    Ok(())
}

/// Parse a donation amount; it must be a positive finite number
pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    let amount: f64 = input.trim().parse().map_err(|_| {
        ValidationError::new("amount", "Please enter a valid donation amount.")
    })?;
    validate_amount_value(amount)?;
    Ok(amount)
}

/// Check an already-numeric amount for positivity and finiteness
pub fn validate_amount_value(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::new(
            "amount",
            "Please enter a valid donation amount.",
        ));
    }
    Ok(())
}

/// Required free-text fields must be non-empty after trimming
pub fn require_non_empty(field: &'static str, input: &str) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::new(
            field,
            format!("Required field '{}' is missing", field),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_number_valid() {
        assert_eq!(parse_mobile_number("9876543210").unwrap(), 9_876_543_210);
        assert_eq!(parse_mobile_number(" 9876543210 ").unwrap(), 9_876_543_210);
    }

    #[test]
    fn test_mobile_number_too_short() {
        let err = parse_mobile_number("12345").unwrap_err();
        assert!(err.message.contains("must be 10 digits"));
    }

    #[test]
    fn test_mobile_number_rejects_leading_zero() {
        // "0123456789" parses to a 9-digit value; it must not pass
        let err = parse_mobile_number("0123456789").unwrap_err();
        assert!(err.message.contains("must be 10 digits"));
    }

    #[test]
    fn test_mobile_number_non_numeric() {
        assert!(parse_mobile_number("98765abcde").is_err());
        assert!(parse_mobile_number("98765432100").is_err());
        assert!(parse_mobile_number("").is_err());
    }

    #[test]
    fn test_mobile_value_rejects_short_numbers() {
        assert!(validate_mobile_value(12345).is_err());
        assert!(validate_mobile_value(9_876_543_210).is_ok());
    }

    #[test]
    fn test_amount_valid() {
        assert_eq!(parse_amount("500").unwrap(), 500.0);
        assert_eq!(parse_amount("500.50").unwrap(), 500.50);
    }

    #[test]
    fn test_amount_not_a_number() {
        let err = parse_amount("abc").unwrap_err();
        assert!(err.message.contains("valid donation amount"));
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("name", "Asha").is_ok());
        let err = require_non_empty("name", "   ").unwrap_err();
        assert_eq!(err.field, "name");
    }
}
