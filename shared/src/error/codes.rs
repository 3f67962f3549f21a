//! Unified error codes for the rules engine
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Voucher errors
//! - 2xxx: Shipping errors
//! - 3xxx: Commission tier errors
//! - 4xxx: Commission transaction errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Voucher ====================
    /// No voucher matches the code or id
    VoucherNotFound = 1001,
    /// Voucher was already redeemed
    VoucherAlreadyUsed = 1002,
    /// Voucher is past its expiry
    VoucherExpired = 1003,
    /// Order value is below the voucher minimum
    VoucherMinOrderNotMet = 1004,
    /// Voucher does not meet the extension preconditions
    VoucherNotExtendable = 1005,
    /// Voucher code already exists
    VoucherCodeExists = 1006,

    // ==================== 2xxx: Shipping ====================
    /// Shipping zone/tier table is malformed
    ShippingConfigInvalid = 2001,
    /// Cart weight is negative or not a number
    InvalidWeight = 2002,

    // ==================== 3xxx: Commission tier ====================
    /// Commission tier not found
    TierNotFound = 3001,
    /// Tier catalog violates an invariant
    TierCatalogInvalid = 3002,
    /// Operation would leave the catalog without a default tier
    DefaultTierRequired = 3003,
    /// Tier id already exists
    TierIdExists = 3004,

    // ==================== 4xxx: Commission transaction ====================
    /// Commission transaction not found
    TransactionNotFound = 4001,
    /// Illegal state-machine edge
    InvalidTransition = 4002,
    /// Transaction is already paid, rejected or cancelled
    TransactionAlreadyTerminal = 4003,
    /// Bulk request failed a batch-level precondition
    BulkPreconditionFailed = 4004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Voucher
            ErrorCode::VoucherNotFound => "Voucher not found",
            ErrorCode::VoucherAlreadyUsed => "Voucher has already been used",
            ErrorCode::VoucherExpired => "Voucher has expired",
            ErrorCode::VoucherMinOrderNotMet => "Order value is below the voucher minimum",
            ErrorCode::VoucherNotExtendable => "Voucher cannot be extended",
            ErrorCode::VoucherCodeExists => "Voucher code already exists",

            // Shipping
            ErrorCode::ShippingConfigInvalid => "Shipping configuration is invalid",
            ErrorCode::InvalidWeight => "Invalid cart weight",

            // Commission tier
            ErrorCode::TierNotFound => "Commission tier not found",
            ErrorCode::TierCatalogInvalid => "Commission tier catalog is invalid",
            ErrorCode::DefaultTierRequired => "Catalog must keep exactly one default tier",
            ErrorCode::TierIdExists => "Commission tier id already exists",

            // Commission transaction
            ErrorCode::TransactionNotFound => "Commission transaction not found",
            ErrorCode::InvalidTransition => "Invalid status transition",
            ErrorCode::TransactionAlreadyTerminal => "Commission transaction is already closed",
            ErrorCode::BulkPreconditionFailed => "Bulk request precondition failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Voucher
            1001 => Ok(ErrorCode::VoucherNotFound),
            1002 => Ok(ErrorCode::VoucherAlreadyUsed),
            1003 => Ok(ErrorCode::VoucherExpired),
            1004 => Ok(ErrorCode::VoucherMinOrderNotMet),
            1005 => Ok(ErrorCode::VoucherNotExtendable),
            1006 => Ok(ErrorCode::VoucherCodeExists),

            // Shipping
            2001 => Ok(ErrorCode::ShippingConfigInvalid),
            2002 => Ok(ErrorCode::InvalidWeight),

            // Commission tier
            3001 => Ok(ErrorCode::TierNotFound),
            3002 => Ok(ErrorCode::TierCatalogInvalid),
            3003 => Ok(ErrorCode::DefaultTierRequired),
            3004 => Ok(ErrorCode::TierIdExists),

            // Commission transaction
            4001 => Ok(ErrorCode::TransactionNotFound),
            4002 => Ok(ErrorCode::InvalidTransition),
            4003 => Ok(ErrorCode::TransactionAlreadyTerminal),
            4004 => Ok(ErrorCode::BulkPreconditionFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
