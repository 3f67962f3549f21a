//! Temporal status of a voucher, derived from stored timestamps

use shared::models::{EXPIRING_THRESHOLD_DAYS, Voucher, VoucherStatus};
use shared::util::DAY_MILLIS;

/// Whole days until expiry, rounded up
///
/// Stays at zero through the first day after `expires_at`, then goes negative.
pub fn days_remaining(voucher: &Voucher, now: i64) -> i64 {
    let diff = voucher.expires_at.saturating_sub(now);
    // Integer division truncates toward zero, which is ceil for negatives
    let days = diff / DAY_MILLIS;
    if diff % DAY_MILLIS > 0 { days + 1 } else { days }
}

/// Derive the status of a voucher at `now`
///
/// Used vouchers are always `Used`. Otherwise a voucher is `Expired` once
/// [`days_remaining`] turns negative, `Expiring` while it is at most
/// [`EXPIRING_THRESHOLD_DAYS`], and `Available` before that.
pub fn derive_status(voucher: &Voucher, now: i64) -> VoucherStatus {
    if voucher.is_used {
        return VoucherStatus::Used;
    }
    let days = days_remaining(voucher, now);
    if days < 0 {
        return VoucherStatus::Expired;
    }
    if days <= EXPIRING_THRESHOLD_DAYS {
        VoucherStatus::Expiring
    } else {
        VoucherStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voucher::test_support::make_voucher;

    const NOW: i64 = 1_780_000_000_000;

    #[test]
    fn test_used_is_terminal_regardless_of_time() {
        let mut v = make_voucher("USED1", NOW + 30 * DAY_MILLIS);
        v.is_used = true;
        assert_eq!(derive_status(&v, NOW), VoucherStatus::Used);
        assert_eq!(derive_status(&v, NOW + 365 * DAY_MILLIS), VoucherStatus::Used);
    }

    #[test]
    fn test_expiring_window() {
        let v = make_voucher("WIN", NOW + 3 * DAY_MILLIS);
        assert_eq!(days_remaining(&v, NOW), 3);
        assert_eq!(derive_status(&v, NOW), VoucherStatus::Expiring);

        let v = make_voucher("WIN", NOW + 3 * DAY_MILLIS + 1);
        assert_eq!(days_remaining(&v, NOW), 4);
        assert_eq!(derive_status(&v, NOW), VoucherStatus::Available);
    }

    #[test]
    fn test_final_day_is_still_expiring() {
        let v = make_voucher("LAST", NOW - 3_600_000);
        assert_eq!(days_remaining(&v, NOW), 0);
        assert_eq!(derive_status(&v, NOW), VoucherStatus::Expiring);

        let v = make_voucher("LAST", NOW);
        assert_eq!(derive_status(&v, NOW + DAY_MILLIS - 1), VoucherStatus::Expiring);
    }

    #[test]
    fn test_expired_once_days_remaining_negative() {
        let v = make_voucher("EXP", NOW);
        assert_eq!(days_remaining(&v, NOW + DAY_MILLIS), -1);
        assert_eq!(derive_status(&v, NOW + DAY_MILLIS), VoucherStatus::Expired);
        assert_eq!(days_remaining(&v, NOW + 2 * DAY_MILLIS), -2);
    }

    #[test]
    fn test_status_is_monotonic_in_time() {
        let v = make_voucher("MONO", NOW + 10 * DAY_MILLIS);
        let mut last_rank = 0;
        for step in 0..40 {
            let rank = derive_status(&v, NOW + step * DAY_MILLIS / 2).rank();
            assert!(rank >= last_rank, "status went backwards at step {}", step);
            last_rank = rank;
        }
        assert_eq!(last_rank, VoucherStatus::Expired.rank());
    }
}
