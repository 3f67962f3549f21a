//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// - 0xxx: General errors
/// - 1xxx: Voucher errors
/// - 2xxx: Shipping errors
/// - 3xxx: Commission tier errors
/// - 4xxx: Commission transaction errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Voucher errors (1xxx)
    Voucher,
    /// Shipping errors (2xxx)
    Shipping,
    /// Commission tier errors (3xxx)
    Tier,
    /// Commission transaction errors (4xxx)
    Transaction,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            1000..2000 => Self::Voucher,
            2000..3000 => Self::Shipping,
            3000..4000 => Self::Tier,
            4000..5000 => Self::Transaction,
            9000..=u16::MAX => Self::System,
            _ => Self::General,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Voucher => "voucher",
            Self::Shipping => "shipping",
            Self::Tier => "tier",
            Self::Transaction => "transaction",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }

    /// Whether this code signals an admin data problem rather than a user error
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ErrorCode::ShippingConfigInvalid
                | ErrorCode::TierCatalogInvalid
                | ErrorCode::DefaultTierRequired
                | ErrorCode::ConfigError
        )
    }
}
