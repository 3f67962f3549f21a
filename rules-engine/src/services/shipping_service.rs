//! Shipping Service
//!
//! Holds the startup shipping table and rates carts against it, or against a
//! config supplied with the request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{CartLine, ShippingConfig, ShippingQuote, VoucherQuote};

use super::VoucherService;
use crate::shipping::{ShippingError, ShippingRateTable, ShippingRatingEngine, total_weight};

/// Order total preview: subtotal, voucher discount and shipping
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutQuote {
    pub subtotal: i64,
    pub discount: i64,
    pub shipping_fee: i64,
    pub total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voucher: Option<VoucherQuote>,
    pub shipping: ShippingQuote,
}

#[derive(Debug, Clone)]
pub struct ShippingService {
    table: Option<Arc<ShippingRateTable>>,
    engine: ShippingRatingEngine,
    default_weight_kg: f64,
}

impl ShippingService {
    pub fn new(
        table: Option<ShippingRateTable>,
        engine: ShippingRatingEngine,
        default_weight_kg: f64,
    ) -> Self {
        Self {
            table: table.map(Arc::new),
            engine,
            default_weight_kg,
        }
    }

    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }

    /// Rate a cart for a destination
    ///
    /// An inline `config` replaces the startup table for this call; it is
    /// validated like the startup one but reported as a request error.
    pub fn compute_fee(
        &self,
        province: Option<&str>,
        lines: &[CartLine],
        config: Option<ShippingConfig>,
    ) -> AppResult<ShippingQuote> {
        let weight = total_weight(lines, self.default_weight_kg)?;
        let inline = config
            .map(ShippingRateTable::load)
            .transpose()
            .map_err(|e: ShippingError| {
                AppError::with_message(
                    ErrorCode::ValidationFailed,
                    format!("Invalid shipping config: {e}"),
                )
            })?;
        let table = inline.as_ref().or(self.table.as_deref());
        let quote = self.engine.compute_fee(province, weight, table)?;
        tracing::debug!(
            province = ?province,
            weight_kg = weight,
            fee = quote.fee,
            fallback = ?quote.fallback,
            "Shipping fee computed"
        );
        Ok(quote)
    }

    /// Preview an order total with an optional voucher
    ///
    /// An unusable voucher contributes no discount; its rejection is returned
    /// in `voucher`. Nothing is redeemed.
    pub async fn quote_checkout(
        &self,
        vouchers: &VoucherService,
        subtotal: i64,
        voucher_code: Option<&str>,
        province: Option<&str>,
        lines: &[CartLine],
    ) -> AppResult<CheckoutQuote> {
        if subtotal < 0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "subtotal must not be negative",
            ));
        }
        let voucher = match voucher_code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Some(vouchers.price(code, subtotal).await?),
            None => None,
        };
        let discount = voucher.as_ref().map_or(0, |q| q.discount_amount);
        let shipping = self.compute_fee(province, lines, None)?;

        Ok(CheckoutQuote {
            subtotal,
            discount,
            shipping_fee: shipping.fee,
            total: subtotal.saturating_sub(discount).saturating_add(shipping.fee),
            voucher,
            shipping,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixed_clock;
    use crate::voucher::test_support::make_voucher;
    use crate::voucher::{MemoryVoucherStore, VoucherStore};
    use shared::models::{FallbackFees, ShippingFallback, ShippingTier, ShippingZone};
    use shared::util::DAY_MILLIS;

    const NOW: i64 = 1_780_000_000_000;

    fn config() -> ShippingConfig {
        ShippingConfig {
            zones: vec![ShippingZone {
                name: "north".into(),
                province_names: vec!["Hà Nội".into()],
                tiers: vec![ShippingTier {
                    min_weight: 0.0,
                    max_weight: 2.0,
                    base_price: 20_000.0,
                    extra_price_per_kg: 5_000.0,
                    is_direct_multiplier: false,
                }],
            }],
            fuel_surcharge_percent: Some(5.0),
            vat_percent: Some(8.0),
        }
    }

    fn service(table: Option<ShippingRateTable>) -> ShippingService {
        ShippingService::new(table, ShippingRatingEngine::new(FallbackFees::default()), 0.5)
    }

    fn lines() -> Vec<CartLine> {
        vec![
            CartLine {
                weight_kg: Some(0.5),
                quantity: 2,
            },
            CartLine {
                weight_kg: None,
                quantity: 1,
            },
        ]
    }

    #[test]
    fn test_startup_table_used() {
        let svc = service(Some(ShippingRateTable::load(config()).unwrap()));
        let quote = svc.compute_fee(Some("Hà Nội"), &lines(), None).unwrap();
        assert_eq!(quote.total_weight_kg, 1.5);
        assert_eq!(quote.fee, 22_680);
    }

    #[test]
    fn test_inline_config_overrides_missing_table() {
        let svc = service(None);
        let fallback = svc.compute_fee(Some("Hà Nội"), &lines(), None).unwrap();
        assert_eq!(fallback.fallback, Some(ShippingFallback::NoConfig));

        let inline = svc
            .compute_fee(Some("Hà Nội"), &lines(), Some(config()))
            .unwrap();
        assert_eq!(inline.fee, 22_680);
    }

    #[test]
    fn test_invalid_inline_config_is_request_error() {
        let mut bad = config();
        bad.zones[0].tiers.clear();
        let err = service(None)
            .compute_fee(Some("Hà Nội"), &lines(), Some(bad))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let bad = [CartLine {
            weight_kg: Some(-2.0),
            quantity: 1,
        }];
        let err = service(None).compute_fee(None, &bad, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidWeight);
    }

    #[tokio::test]
    async fn test_checkout_quote_combines_discount_and_shipping() {
        let store = Arc::new(MemoryVoucherStore::new());
        store
            .insert(&make_voucher("TEN", NOW + 10 * DAY_MILLIS))
            .await
            .unwrap();
        let vouchers = VoucherService::new(store, fixed_clock(NOW));
        let svc = service(Some(ShippingRateTable::load(config()).unwrap()));

        let quote = svc
            .quote_checkout(&vouchers, 300_000, Some("ten"), Some("Hà Nội"), &lines())
            .await
            .unwrap();
        assert_eq!(quote.discount, 30_000);
        assert_eq!(quote.shipping_fee, 22_680);
        assert_eq!(quote.total, 292_680);

        let without = svc
            .quote_checkout(&vouchers, 300_000, Some("MISSING"), None, &lines())
            .await
            .unwrap();
        assert_eq!(without.discount, 0);
        assert!(!without.voucher.unwrap().valid);
        assert_eq!(without.shipping_fee, 30_000);
        assert_eq!(without.total, 330_000);
    }
}
