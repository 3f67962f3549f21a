//! Unified error system for the rules engine
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Voucher errors
//! - 2xxx: Shipping errors
//! - 3xxx: Commission tier errors
//! - 4xxx: Commission transaction errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::VoucherExpired)
//!     .with_detail("code", "SUMMER24");
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(1003));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
