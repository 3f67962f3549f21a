//! Voucher mutations: redemption and paid extension
//!
//! Both are planned here as pure functions producing the post-state, then
//! persisted by the service through [`VoucherStore::conditional_update`]
//! guarded on the [`VoucherGuard`] of the pre-state.
//!
//! [`VoucherStore::conditional_update`]: super::store::VoucherStore::conditional_update

use shared::models::{Voucher, VoucherRejection, VoucherSource, VoucherStatus};
use shared::util::DAY_MILLIS;

use super::status::derive_status;

/// Columns a conditional voucher update is keyed on
///
/// A write only lands if the stored record still matches the guard taken
/// when the mutation was planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoucherGuard {
    pub is_used: bool,
    pub extension_count: u32,
    pub expires_at: i64,
}

impl VoucherGuard {
    pub fn of(voucher: &Voucher) -> Self {
        Self {
            is_used: voucher.is_used,
            extension_count: voucher.extension_count,
            expires_at: voucher.expires_at,
        }
    }
}

/// Plan the redemption of a voucher at `now`
///
/// Expiry is checked again here so a voucher that lapsed between pricing
/// and order finalization cannot be consumed.
pub fn plan_redemption(voucher: &Voucher, now: i64) -> Result<Voucher, VoucherRejection> {
    match derive_status(voucher, now) {
        VoucherStatus::Used => Err(VoucherRejection::AlreadyUsed),
        VoucherStatus::Expired => Err(VoucherRejection::Expired),
        VoucherStatus::Available | VoucherStatus::Expiring => {
            let mut redeemed = voucher.clone();
            redeemed.is_used = true;
            redeemed.used_at = Some(now);
            Ok(redeemed)
        }
    }
}

/// Whether a paid extension is currently allowed
///
/// Only unused order-reward vouchers with a positive fee and remaining
/// extensions qualify. Expired vouchers are extendable.
pub fn can_extend(voucher: &Voucher) -> bool {
    voucher.source == VoucherSource::OrderReward
        && voucher.extension_fee > 0
        && voucher.extension_count < voucher.max_extensions
        && !voucher.is_used
}

/// Plan a paid extension at `now`
///
/// The new expiry counts from the later of the current expiry and `now`, so
/// extending a lapsed voucher never yields an expiry in the past. The fee
/// charge is recorded in the same post-state as the new expiry.
pub fn plan_extension(voucher: &Voucher, payment_ref: &str, now: i64) -> Option<Voucher> {
    if !can_extend(voucher) {
        return None;
    }
    let extension = i64::from(voucher.extension_days).saturating_mul(DAY_MILLIS);
    let mut extended = voucher.clone();
    extended.expires_at = voucher.expires_at.max(now).saturating_add(extension);
    extended.extension_count += 1;
    extended.extension_fees_paid = voucher
        .extension_fees_paid
        .saturating_add(voucher.extension_fee);
    extended.last_extension_ref = Some(payment_ref.to_string());
    Some(extended)
}
