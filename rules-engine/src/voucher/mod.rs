//! Voucher engine
//!
//! - [`status`]: temporal status derived from stored timestamps
//! - [`pricing`]: eligibility checks and bounded discount computation
//! - [`lifecycle`]: redemption and paid extension planning
//! - [`grouping`]: customer listing (grouping, ordering, masking)
//! - [`store`]: record store trait and in-memory adapter
//!
//! Everything except the store is pure; `now` is always passed in by the
//! service from the server clock.

pub mod grouping;
pub mod lifecycle;
pub mod pricing;
pub mod status;
pub mod store;

pub use grouping::{build_listing, group_and_filter, mask_code};
pub use lifecycle::{VoucherGuard, can_extend, plan_extension, plan_redemption};
pub use pricing::{compute_discount, validate_and_price};
pub use status::{days_remaining, derive_status};
pub use store::{MemoryVoucherStore, VoucherStore};

#[cfg(test)]
pub(crate) mod test_support {
    use shared::models::{
        DEFAULT_EXTENSION_DAYS, DEFAULT_MAX_EXTENSIONS, DiscountType, Voucher, VoucherSource,
    };
    use std::sync::atomic::{AtomicI64, Ordering};

    static NEXT_ID: AtomicI64 = AtomicI64::new(1);

    /// Unused 10% package voucher with no minimum
    pub fn make_voucher(code: &str, expires_at: i64) -> Voucher {
        Voucher {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            code: code.to_string(),
            owner_id: Some(1),
            discount_type: DiscountType::Percent,
            discount_value: 10.0,
            max_discount: None,
            min_order_value: 0,
            expires_at,
            is_used: false,
            used_at: None,
            source: VoucherSource::Package,
            extension_count: 0,
            max_extensions: DEFAULT_MAX_EXTENSIONS,
            extension_fee: 0,
            extension_days: DEFAULT_EXTENSION_DAYS,
            extension_fees_paid: 0,
            last_extension_ref: None,
            created_at: 0,
        }
    }

    /// Order-reward voucher with a paid extension available
    pub fn make_reward_voucher(code: &str, expires_at: i64, fee: i64) -> Voucher {
        Voucher {
            source: VoucherSource::OrderReward,
            extension_fee: fee,
            ..make_voucher(code, expires_at)
        }
    }
}
