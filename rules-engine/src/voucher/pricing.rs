//! Voucher eligibility and discount computation
//!
//! Pure preview: nothing here touches the store.

use rust_decimal::Decimal;
use shared::models::{DiscountType, Voucher, VoucherQuote, VoucherRejection, VoucherStatus};

use super::status::derive_status;
use crate::money::{cap_discount, percent_discount, round_currency, to_decimal};

/// Discount a voucher grants on `order_value`, ignoring eligibility
///
/// Always within `[0, order_value]`; percent discounts are also bounded by
/// `max_discount` when set.
pub fn compute_discount(voucher: &Voucher, order_value: i64) -> i64 {
    match voucher.discount_type {
        DiscountType::Percent => cap_discount(
            percent_discount(order_value, voucher.discount_value),
            voucher.max_discount,
            order_value,
        ),
        DiscountType::Fixed => cap_discount(
            round_currency(to_decimal(voucher.discount_value).max(Decimal::ZERO)),
            None,
            order_value,
        ),
    }
}

/// Check whether a voucher could be applied to an order right now
///
/// Checks run in a fixed order: existence, used, expired, minimum order.
pub fn check_eligibility(
    voucher: Option<&Voucher>,
    order_value: i64,
    now: i64,
) -> Result<&Voucher, VoucherRejection> {
    let voucher = voucher.ok_or(VoucherRejection::NotFound)?;
    match derive_status(voucher, now) {
        VoucherStatus::Used => return Err(VoucherRejection::AlreadyUsed),
        VoucherStatus::Expired => return Err(VoucherRejection::Expired),
        VoucherStatus::Available | VoucherStatus::Expiring => {}
    }
    if order_value < voucher.min_order_value {
        return Err(VoucherRejection::MinOrderNotMet);
    }
    Ok(voucher)
}

/// Validate a voucher against an order and price the discount
pub fn validate_and_price(voucher: Option<&Voucher>, order_value: i64, now: i64) -> VoucherQuote {
    match check_eligibility(voucher, order_value, now) {
        Ok(voucher) => VoucherQuote::accepted(compute_discount(voucher, order_value)),
        Err(reason) => VoucherQuote::rejected(reason),
    }
}
