//! Input validation helpers
//!
//! Request DTOs derive [`validator::Validate`]; handlers run
//! [`validate_request`] before touching a service. Text limits are shared
//! across DTOs.

use shared::error::AppError;
use shared::models::CartLine;
use validator::{Validate, ValidationError};

// ── Text length limits ──────────────────────────────────────────────

/// Voucher codes
pub const MAX_CODE_LEN: u64 = 64;

/// Tier ids and names, province names, payment methods
pub const MAX_NAME_LEN: u64 = 200;

/// Payment references
pub const MAX_REFERENCE_LEN: u64 = 128;

/// Notes and reasons
pub const MAX_NOTE_LEN: u64 = 500;

/// Cart lines per request
pub const MAX_CART_LINES: u64 = 1000;

/// Ids per bulk transition
pub const MAX_BULK_IDS: u64 = 500;

/// Run derive-based validation and map failures to `ValidationFailed`
pub fn validate_request<T: Validate>(req: &T) -> Result<(), AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))
}

/// Reject strings that are empty after trimming
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Reject NaN, infinities and negatives
pub fn non_negative_number(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new("non_negative_number"));
    }
    Ok(())
}

/// Every explicit line weight must be a non-negative number
pub fn cart_weights(lines: &[CartLine]) -> Result<(), ValidationError> {
    lines
        .iter()
        .filter_map(|line| line.weight_kg)
        .try_for_each(non_negative_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, max = 4), custom(function = "not_blank"))]
        code: String,
        #[validate(custom(function = "non_negative_number"))]
        weight: f64,
    }

    #[test]
    fn test_valid_request_passes() {
        let sample = Sample {
            code: "AB".into(),
            weight: 0.0,
        };
        assert!(validate_request(&sample).is_ok());
    }

    #[test]
    fn test_blank_and_negative_rejected() {
        let blank = Sample {
            code: "  ".into(),
            weight: 1.0,
        };
        assert_eq!(
            validate_request(&blank).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
        let negative = Sample {
            code: "AB".into(),
            weight: -0.5,
        };
        assert!(validate_request(&negative).is_err());
        let nan = Sample {
            code: "AB".into(),
            weight: f64::NAN,
        };
        assert!(validate_request(&nan).is_err());
    }

    #[test]
    fn test_cart_weights() {
        let ok = [
            CartLine {
                weight_kg: Some(1.5),
                quantity: 2,
            },
            CartLine {
                weight_kg: None,
                quantity: 1,
            },
        ];
        assert!(cart_weights(&ok).is_ok());

        let negative = [CartLine {
            weight_kg: Some(-0.1),
            quantity: 1,
        }];
        assert_eq!(
            cart_weights(&negative).unwrap_err().code,
            "non_negative_number"
        );
    }
}
