//! Shared types for the pricing & commission rules engine
//!
//! Data model records (vouchers, shipping tables, commission tiers and
//! transactions), the unified error system, and small utilities used by the
//! engine crate and by any transport that exposes it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
