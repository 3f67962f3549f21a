//! Data models
//!
//! Shared between the rules engine and its HTTP clients.
//! All record IDs are `i64` snowflakes except tier ids (admin slugs).
//! All timestamps are Unix millis.

pub mod commission_tier;
pub mod commission_transaction;
pub mod shipping;
pub mod voucher;

// Re-exports
pub use commission_tier::*;
pub use commission_transaction::*;
pub use shipping::*;
pub use voucher::*;
