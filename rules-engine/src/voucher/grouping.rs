//! Customer voucher listing: grouping, ordering and code masking

use shared::models::{
    Voucher, VoucherFilter, VoucherGroupView, VoucherSource, VoucherStatus, VoucherView,
};

use super::lifecycle::can_extend;
use super::status::{days_remaining, derive_status};

/// Group display order; manual vouchers are shown under `Other`
pub const GROUP_ORDER: [VoucherSource; 4] = [
    VoucherSource::Package,
    VoucherSource::OrderReward,
    VoucherSource::Campaign,
    VoucherSource::Other,
];

/// Vouchers of one display group, with their derived status
#[derive(Debug, Clone)]
pub struct VoucherGroup<'a> {
    pub source: VoucherSource,
    pub vouchers: Vec<(&'a Voucher, VoucherStatus)>,
}

fn display_group(source: VoucherSource) -> VoucherSource {
    match source {
        VoucherSource::Manual => VoucherSource::Other,
        other => other,
    }
}

/// Filter, group and order vouchers for display
///
/// The filter narrows membership first. Groups follow [`GROUP_ORDER`] and
/// empty groups are omitted. Inside a group vouchers are stably sorted by
/// status rank, so ties keep their input order.
pub fn group_and_filter(
    vouchers: &[Voucher],
    filter: VoucherFilter,
    now: i64,
) -> Vec<VoucherGroup<'_>> {
    let admitted: Vec<(&Voucher, VoucherStatus)> = vouchers
        .iter()
        .map(|v| (v, derive_status(v, now)))
        .filter(|(_, status)| filter.admits(*status))
        .collect();

    GROUP_ORDER
        .iter()
        .filter_map(|&source| {
            let mut members: Vec<_> = admitted
                .iter()
                .filter(|(v, _)| display_group(v.source) == source)
                .copied()
                .collect();
            if members.is_empty() {
                return None;
            }
            members.sort_by_key(|(_, status)| status.rank());
            Some(VoucherGroup {
                source,
                vouchers: members,
            })
        })
        .collect()
}

/// Mask a voucher code down to its last four characters
pub fn mask_code(code: &str) -> String {
    let len = code.chars().count();
    if len <= 4 {
        return "****".to_string();
    }
    let tail: String = code.chars().skip(len - 4).collect();
    format!("****{}", tail)
}

/// Build the masked listing view of one voucher
pub fn to_view(voucher: &Voucher, status: VoucherStatus, now: i64) -> VoucherView {
    VoucherView {
        id: voucher.id,
        masked_code: mask_code(&voucher.code),
        discount_type: voucher.discount_type,
        discount_value: voucher.discount_value,
        max_discount: voucher.max_discount,
        min_order_value: voucher.min_order_value,
        expires_at: voucher.expires_at,
        status,
        days_remaining: days_remaining(voucher, now),
        can_extend: can_extend(voucher),
        extension_fee: voucher.extension_fee,
    }
}

/// Group, filter and mask in one pass
pub fn build_listing(vouchers: &[Voucher], filter: VoucherFilter, now: i64) -> Vec<VoucherGroupView> {
    group_and_filter(vouchers, filter, now)
        .into_iter()
        .map(|group| VoucherGroupView {
            source: group.source,
            vouchers: group
                .vouchers
                .into_iter()
                .map(|(v, status)| to_view(v, status, now))
                .collect(),
        })
        .collect()
}
