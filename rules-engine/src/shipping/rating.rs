//! Shipping fee rating: destination + weight -> fee

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use shared::models::{CartLine, FallbackFees, ShippingFallback, ShippingQuote, ShippingTier};

use super::table::{ShippingError, ShippingRateTable};
use crate::money::{compound_surcharge, round_currency, to_decimal};

/// Sum of `(weight_kg ?? default) * quantity` over the cart
///
/// The sum is not rounded; only the final fee is.
pub fn total_weight(lines: &[CartLine], default_weight_kg: f64) -> Result<f64, ShippingError> {
    if !default_weight_kg.is_finite() || default_weight_kg < 0.0 {
        return Err(ShippingError::InvalidWeight(format!(
            "default weight {default_weight_kg} must be a non-negative number"
        )));
    }
    let mut total = Decimal::ZERO;
    for (index, line) in lines.iter().enumerate() {
        let weight = line.weight_kg.unwrap_or(default_weight_kg);
        if !weight.is_finite() || weight < 0.0 {
            return Err(ShippingError::InvalidWeight(format!(
                "line {index}: weight {weight} must be a non-negative number"
            )));
        }
        total += to_decimal(weight) * Decimal::from(line.quantity);
    }
    total.to_f64().ok_or_else(|| {
        ShippingError::InvalidWeight(format!("total weight {total} is out of range"))
    })
}

/// Pick the tier for `weight` from tiers sorted by `min_weight`
///
/// Returns the index of the first tier with `min < weight <= max`. Weights at
/// or below the first minimum use the first tier; weights above every tier
/// use the last one. `tiers` must be non-empty.
pub fn select_tier(tiers: &[ShippingTier], weight: f64) -> usize {
    if tiers.first().is_some_and(|first| weight <= first.min_weight) {
        return 0;
    }
    tiers
        .iter()
        .position(|t| t.min_weight < weight && weight <= t.max_weight)
        .unwrap_or(tiers.len().saturating_sub(1))
}

/// Fee of one tier before surcharges
///
/// Direct-multiplier tiers charge `weight * extra_price_per_kg`. Other tiers
/// charge `base_price`, plus `extra_price_per_kg` for each kg above the
/// tier's `max_weight` when the weight overflows the last tier.
pub fn tier_base_fee(tier: &ShippingTier, weight: f64) -> Decimal {
    let weight = to_decimal(weight);
    let per_kg = to_decimal(tier.extra_price_per_kg);
    if tier.is_direct_multiplier {
        return weight * per_kg;
    }
    let overflow = (weight - to_decimal(tier.max_weight)).max(Decimal::ZERO);
    to_decimal(tier.base_price) + overflow * per_kg
}

/// Rating engine holding the fallback fee policy
#[derive(Debug, Clone, Copy, Default)]
pub struct ShippingRatingEngine {
    fallback: FallbackFees,
}

impl ShippingRatingEngine {
    pub fn new(fallback: FallbackFees) -> Self {
        Self { fallback }
    }

    fn fallback_quote(&self, reason: ShippingFallback, weight: f64) -> ShippingQuote {
        let fee = match reason {
            ShippingFallback::NoConfig => self.fallback.no_config,
            ShippingFallback::NoZone => self.fallback.no_zone,
        };
        ShippingQuote {
            fee,
            total_weight_kg: weight,
            zone_name: None,
            tier_index: None,
            fallback: Some(reason),
        }
    }

    /// Rate a shipment
    ///
    /// Missing table or destination yields the `no_config` fallback; a
    /// destination outside every zone yields the `no_zone` fallback.
    /// Surcharges compound fuel first, then VAT, and the fee is rounded once.
    pub fn compute_fee(
        &self,
        province: Option<&str>,
        total_weight_kg: f64,
        table: Option<&ShippingRateTable>,
    ) -> Result<ShippingQuote, ShippingError> {
        if !total_weight_kg.is_finite() || total_weight_kg < 0.0 {
            return Err(ShippingError::InvalidWeight(format!(
                "total weight {total_weight_kg} must be a non-negative number"
            )));
        }

        let province = province.map(str::trim).filter(|p| !p.is_empty());
        let (Some(table), Some(province)) = (table, province) else {
            return Ok(self.fallback_quote(ShippingFallback::NoConfig, total_weight_kg));
        };
        let Some(zone) = table.zone_for(province) else {
            tracing::debug!(province = %province, "No shipping zone for destination");
            return Ok(self.fallback_quote(ShippingFallback::NoZone, total_weight_kg));
        };

        let tier_index = select_tier(&zone.tiers, total_weight_kg);
        let base = tier_base_fee(&zone.tiers[tier_index], total_weight_kg);
        let with_fuel = compound_surcharge(base, table.fuel_surcharge_percent());
        let with_vat = compound_surcharge(with_fuel, table.vat_percent());

        Ok(ShippingQuote {
            fee: round_currency(with_vat),
            total_weight_kg,
            zone_name: Some(zone.name.clone()),
            tier_index: Some(tier_index),
            fallback: None,
        })
    }
}
