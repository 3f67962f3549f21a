//! Voucher Service
//!
//! Looks records up through a [`VoucherStore`], runs the pure voucher engine
//! against the server clock, and persists mutations with a guarded
//! conditional update. A writer that loses a race sees the same outcome as a
//! sequential second attempt.

use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    DiscountType, ExtendOutcome, RedeemOutcome, Voucher, VoucherCreate, VoucherFilter,
    VoucherGroupView, VoucherQuote, VoucherRejection,
};
use shared::util::snowflake_id;

use super::Clock;
use crate::db::StoreError;
use crate::voucher::{
    VoucherGuard, VoucherStore, build_listing, plan_extension, plan_redemption,
    validate_and_price,
};

#[derive(Clone)]
pub struct VoucherService {
    store: Arc<dyn VoucherStore>,
    clock: Clock,
}

impl std::fmt::Debug for VoucherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoucherService").finish_non_exhaustive()
    }
}

impl VoucherService {
    pub fn new(store: Arc<dyn VoucherStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    fn now(&self) -> i64 {
        (self.clock)()
    }

    /// Price a voucher against an order without side effects
    pub async fn price(&self, code: &str, order_value: i64) -> AppResult<VoucherQuote> {
        if order_value < 0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "order_value must not be negative",
            ));
        }
        let voucher = self.store.find_by_code(code.trim()).await?;
        let quote = validate_and_price(voucher.as_ref(), order_value, self.now());
        tracing::debug!(
            code = %code,
            order_value,
            valid = quote.valid,
            discount = quote.discount_amount,
            "Voucher priced"
        );
        Ok(quote)
    }

    /// Consume a voucher at order finalization
    ///
    /// Business rejections are reported in the outcome; only store failures
    /// are errors.
    pub async fn redeem(&self, code: &str) -> AppResult<RedeemOutcome> {
        let Some(voucher) = self.store.find_by_code(code.trim()).await? else {
            return Ok(redeem_rejected(VoucherRejection::NotFound));
        };
        let now = self.now();
        let redeemed = match plan_redemption(&voucher, now) {
            Ok(redeemed) => redeemed,
            Err(reason) => return Ok(redeem_rejected(reason)),
        };

        let landed = self
            .store
            .conditional_update(voucher.id, VoucherGuard::of(&voucher), &redeemed)
            .await?;
        if !landed {
            tracing::info!(voucher_id = voucher.id, "Voucher redemption lost a concurrent race");
            return Ok(redeem_rejected(VoucherRejection::AlreadyUsed));
        }

        tracing::info!(
            target: "audit",
            action = "voucher.redeem",
            voucher_id = voucher.id,
            owner_id = ?voucher.owner_id,
            used_at = now,
            "AUDIT"
        );
        Ok(RedeemOutcome {
            ok: true,
            reason: None,
            used_at: Some(now),
        })
    }

    /// Apply one paid extension, charging the fee in the same write
    pub async fn extend(&self, voucher_id: i64, payment_ref: &str) -> AppResult<ExtendOutcome> {
        let payment_ref = payment_ref.trim();
        if payment_ref.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "payment_ref is required",
            ));
        }
        let Some(voucher) = self.store.find_by_id(voucher_id).await? else {
            return Ok(extend_rejected(ErrorCode::VoucherNotFound));
        };
        let now = self.now();
        let Some(extended) = plan_extension(&voucher, payment_ref, now) else {
            return Ok(extend_rejected(ErrorCode::VoucherNotExtendable));
        };

        let landed = self
            .store
            .conditional_update(voucher.id, VoucherGuard::of(&voucher), &extended)
            .await?;
        if !landed {
            tracing::info!(voucher_id, "Voucher extension lost a concurrent race");
            return Ok(extend_rejected(ErrorCode::VoucherNotExtendable));
        }

        tracing::info!(
            target: "audit",
            action = "voucher.extend",
            voucher_id,
            fee = voucher.extension_fee,
            payment_ref = %payment_ref,
            extension_count = extended.extension_count,
            new_expires_at = extended.expires_at,
            "AUDIT"
        );
        Ok(ExtendOutcome {
            ok: true,
            new_expires_at: Some(extended.expires_at),
            reason: None,
        })
    }

    /// Grouped, masked listing of one customer's vouchers
    pub async fn list_for_owner(
        &self,
        owner_id: i64,
        filter: VoucherFilter,
    ) -> AppResult<Vec<VoucherGroupView>> {
        let vouchers = self.store.list_by_owner(owner_id).await?;
        Ok(build_listing(&vouchers, filter, self.now()))
    }

    /// Issue a new voucher
    pub async fn issue(&self, payload: VoucherCreate) -> AppResult<Voucher> {
        check_issue(&payload)?;
        let voucher = payload.into_voucher(snowflake_id(), self.now());
        match self.store.insert(&voucher).await {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => {
                return Err(AppError::with_message(
                    ErrorCode::VoucherCodeExists,
                    format!("Voucher code '{}' already exists", voucher.code),
                ));
            }
            Err(e) => return Err(e.into()),
        }
        tracing::info!(
            target: "audit",
            action = "voucher.issue",
            voucher_id = voucher.id,
            source = voucher.source.as_str(),
            owner_id = ?voucher.owner_id,
            "AUDIT"
        );
        Ok(voucher)
    }
}

fn redeem_rejected(reason: VoucherRejection) -> RedeemOutcome {
    RedeemOutcome {
        ok: false,
        reason: Some(reason.error_code()),
        used_at: None,
    }
}

fn extend_rejected(reason: ErrorCode) -> ExtendOutcome {
    ExtendOutcome {
        ok: false,
        new_expires_at: None,
        reason: Some(reason),
    }
}

fn check_issue(payload: &VoucherCreate) -> AppResult<()> {
    if payload.code.trim().is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "code is required"));
    }
    if !payload.discount_value.is_finite() || payload.discount_value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "discount_value must be a non-negative number",
        ));
    }
    if payload.discount_type == DiscountType::Percent && payload.discount_value > 100.0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "percent discount_value must not exceed 100",
        ));
    }
    if payload.max_discount.is_some_and(|cap| cap < 0)
        || payload.min_order_value < 0
        || payload.extension_fee < 0
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "amounts must not be negative",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixed_clock;
    use crate::voucher::MemoryVoucherStore;
    use crate::voucher::test_support::{make_reward_voucher, make_voucher};
    use shared::models::{VoucherSource, VoucherStatus};
    use shared::util::DAY_MILLIS;

    const NOW: i64 = 1_780_000_000_000;

    async fn service_with(vouchers: &[Voucher]) -> VoucherService {
        let store = Arc::new(MemoryVoucherStore::new());
        for v in vouchers {
            store.insert(v).await.unwrap();
        }
        VoucherService::new(store, fixed_clock(NOW))
    }

    #[tokio::test]
    async fn test_price_cap_example() {
        let mut v = make_voucher("BIG20", NOW + 10 * DAY_MILLIS);
        v.discount_value = 20.0;
        v.max_discount = Some(50_000);
        v.min_order_value = 200_000;
        let service = service_with(&[v]).await;

        let quote = service.price("big20", 1_000_000).await.unwrap();
        assert!(quote.valid);
        assert_eq!(quote.discount_amount, 50_000);

        let below = service.price("BIG20", 100_000).await.unwrap();
        assert_eq!(below.reason, Some(VoucherRejection::MinOrderNotMet));

        let missing = service.price("NOPE", 100_000).await.unwrap();
        assert_eq!(missing.reason, Some(VoucherRejection::NotFound));

        assert!(service.price("BIG20", -1).await.is_err());
    }

    #[tokio::test]
    async fn test_redeem_once() {
        let v = make_voucher("ONCE", NOW + DAY_MILLIS);
        let service = service_with(&[v]).await;

        let first = service.redeem("once").await.unwrap();
        assert!(first.ok);
        assert_eq!(first.used_at, Some(NOW));

        let second = service.redeem("ONCE").await.unwrap();
        assert!(!second.ok);
        assert_eq!(second.reason, Some(ErrorCode::VoucherAlreadyUsed));
    }

    #[tokio::test]
    async fn test_redeem_expired_and_missing() {
        let v = make_voucher("OLD", NOW - DAY_MILLIS);
        let service = service_with(&[v]).await;
        let expired = service.redeem("OLD").await.unwrap();
        assert_eq!(expired.reason, Some(ErrorCode::VoucherExpired));
        let missing = service.redeem("GHOST").await.unwrap();
        assert_eq!(missing.reason, Some(ErrorCode::VoucherNotFound));
    }

    #[tokio::test]
    async fn test_extend_until_cap() {
        let mut v = make_reward_voucher("EXT", NOW + DAY_MILLIS, 15_000);
        v.max_extensions = 2;
        let id = v.id;
        let service = service_with(&[v]).await;

        let first = service.extend(id, "PAY-1").await.unwrap();
        assert!(first.ok);
        assert_eq!(first.new_expires_at, Some(NOW + DAY_MILLIS + 90 * DAY_MILLIS));
        assert!(service.extend(id, "PAY-2").await.unwrap().ok);

        let third = service.extend(id, "PAY-3").await.unwrap();
        assert!(!third.ok);
        assert_eq!(third.reason, Some(ErrorCode::VoucherNotExtendable));

        let stored = service.store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.extension_count, 2);
        assert_eq!(stored.extension_fees_paid, 30_000);
        assert_eq!(stored.last_extension_ref.as_deref(), Some("PAY-2"));
    }

    #[tokio::test]
    async fn test_extend_requires_payment_ref() {
        let v = make_reward_voucher("EXT2", NOW, 15_000);
        let id = v.id;
        let service = service_with(&[v]).await;
        let err = service.extend(id, "  ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let missing = service.extend(id + 1_000_000, "PAY").await.unwrap();
        assert_eq!(missing.reason, Some(ErrorCode::VoucherNotFound));
    }

    #[tokio::test]
    async fn test_list_for_owner_groups_and_masks() {
        let mut reward = make_reward_voucher("REWARD-ABCD", NOW + 2 * DAY_MILLIS, 10_000);
        reward.owner_id = Some(42);
        let mut package = make_voucher("PKG-WXYZ", NOW + 30 * DAY_MILLIS);
        package.owner_id = Some(42);
        let service = service_with(&[reward, package]).await;

        let groups = service.list_for_owner(42, VoucherFilter::All).await.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].source, VoucherSource::Package);
        assert_eq!(groups[0].vouchers[0].masked_code, "****WXYZ");
        assert_eq!(groups[1].vouchers[0].status, VoucherStatus::Expiring);
        assert!(groups[1].vouchers[0].can_extend);
    }

    #[tokio::test]
    async fn test_issue_and_duplicate_code() {
        let service = service_with(&[]).await;
        let payload = VoucherCreate {
            code: " WELCOME ".into(),
            owner_id: Some(3),
            discount_type: DiscountType::Fixed,
            discount_value: 20_000.0,
            max_discount: None,
            min_order_value: 0,
            expires_at: NOW + 30 * DAY_MILLIS,
            source: VoucherSource::Campaign,
            max_extensions: 1,
            extension_fee: 0,
            extension_days: 90,
        };
        let issued = service.issue(payload.clone()).await.unwrap();
        assert_eq!(issued.code, "WELCOME");
        assert_eq!(issued.created_at, NOW);

        let err = service
            .issue(VoucherCreate {
                code: "welcome".into(),
                ..payload.clone()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VoucherCodeExists);

        let err = service
            .issue(VoucherCreate {
                code: "PCT".into(),
                discount_type: DiscountType::Percent,
                discount_value: 150.0,
                ..payload
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }
}
