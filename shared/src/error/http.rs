//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::VoucherNotFound
            | Self::TierNotFound
            | Self::TransactionNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::VoucherAlreadyUsed
            | Self::VoucherCodeExists
            | Self::TierIdExists
            | Self::InvalidTransition
            | Self::TransactionAlreadyTerminal => StatusCode::CONFLICT,

            // 422 Unprocessable Entity (catalog edits that break an invariant)
            Self::TierCatalogInvalid | Self::DefaultTierRequired => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::ShippingConfigInvalid => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
