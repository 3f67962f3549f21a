//! Shipping fee rating
//!
//! [`ShippingRateTable`] validates an admin-managed [`ShippingConfig`] once at
//! load; [`ShippingRatingEngine`] turns a destination and cart weight into a
//! fee against it.
//!
//! [`ShippingConfig`]: shared::models::ShippingConfig

pub mod rating;
pub mod table;

pub use rating::{ShippingRatingEngine, select_tier, total_weight};
pub use table::{ShippingError, ShippingRateTable};

use shared::error::{AppError, ErrorCode};

impl From<ShippingError> for AppError {
    fn from(err: ShippingError) -> Self {
        match err {
            ShippingError::InvalidWeight(msg) => AppError::with_message(ErrorCode::InvalidWeight, msg),
            other => AppError::with_message(ErrorCode::ShippingConfigInvalid, other.to_string()),
        }
    }
}
