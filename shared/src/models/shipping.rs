//! Shipping Rate Models

use serde::{Deserialize, Serialize};

/// Weight bracket inside a zone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingTier {
    /// Exclusive lower bound (kg)
    pub min_weight: f64,
    /// Inclusive upper bound (kg)
    pub max_weight: f64,
    pub base_price: f64,
    pub extra_price_per_kg: f64,
    /// Fee is `weight * extra_price_per_kg`, ignoring `base_price`
    #[serde(default)]
    pub is_direct_multiplier: bool,
}

/// Geographic grouping of provinces sharing one tier table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingZone {
    pub name: String,
    pub province_names: Vec<String>,
    pub tiers: Vec<ShippingTier>,
}

/// Full shipping rate configuration (admin managed)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShippingConfig {
    pub zones: Vec<ShippingZone>,
    #[serde(default)]
    pub fuel_surcharge_percent: Option<f64>,
    #[serde(default)]
    pub vat_percent: Option<f64>,
}

/// One cart line as seen by the rating engine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Per-unit weight; lines without one use the configured default
    #[serde(default)]
    pub weight_kg: Option<f64>,
    pub quantity: u32,
}

/// Why a fixed fallback fee was charged instead of a rated one
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShippingFallback {
    /// No configuration loaded or no destination given
    NoConfig,
    /// Destination is not covered by any zone
    NoZone,
}

/// Fixed fees used when a destination cannot be rated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FallbackFees {
    pub no_config: i64,
    pub no_zone: i64,
}

impl Default for FallbackFees {
    fn default() -> Self {
        Self {
            no_config: 30_000,
            no_zone: 50_000,
        }
    }
}

/// Rated shipping fee with the lookup that produced it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingQuote {
    pub fee: i64,
    pub total_weight_kg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_name: Option<String>,
    /// Index of the selected tier after sorting by `min_weight`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<ShippingFallback>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialize_with_optional_surcharges() {
        let json = r#"{
            "zones": [{
                "name": "north",
                "province_names": ["Hà Nội"],
                "tiers": [{"min_weight": 0, "max_weight": 2, "base_price": 20000, "extra_price_per_kg": 5000}]
            }]
        }"#;
        let config: ShippingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.zones.len(), 1);
        assert!(!config.zones[0].tiers[0].is_direct_multiplier);
        assert_eq!(config.fuel_surcharge_percent, None);
        assert_eq!(config.vat_percent, None);
    }

    #[test]
    fn test_fallback_fees_are_distinct() {
        let fees = FallbackFees::default();
        assert_ne!(fees.no_config, fees.no_zone);
    }
}
