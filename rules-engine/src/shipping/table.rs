//! Validated shipping rate table

use std::collections::HashMap;
use std::path::Path;

use shared::models::{ShippingConfig, ShippingTier};
use thiserror::Error;

/// Shipping errors
#[derive(Debug, Error)]
pub enum ShippingError {
    #[error("zone '{0}' has no weight tiers")]
    EmptyZone(String),

    #[error("zone '{zone}' tier {index}: {reason}")]
    InvalidTier {
        zone: String,
        index: usize,
        reason: String,
    },

    #[error("province '{province}' is in both '{first}' and '{second}'")]
    DuplicateProvince {
        province: String,
        first: String,
        second: String,
    },

    #[error("{name} must be a non-negative number, got {value}")]
    InvalidSurcharge { name: &'static str, value: f64 },

    #[error("failed to read shipping config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse shipping config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid weight: {0}")]
    InvalidWeight(String),
}

/// Zone with its tiers sorted by `min_weight`
#[derive(Debug, Clone)]
pub struct RatedZone {
    pub name: String,
    pub tiers: Vec<ShippingTier>,
}

/// Immutable, validated view of a [`ShippingConfig`]
#[derive(Debug, Clone)]
pub struct ShippingRateTable {
    zones: Vec<RatedZone>,
    /// Normalized province name -> index into `zones`
    provinces: HashMap<String, usize>,
    fuel_surcharge_percent: Option<f64>,
    vat_percent: Option<f64>,
}

/// Normalize a province name for lookup
pub(crate) fn normalize_province(name: &str) -> String {
    name.trim().to_lowercase()
}

fn check_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn validate_tier(zone: &str, index: usize, tier: &ShippingTier) -> Result<(), ShippingError> {
    let invalid = |reason: String| ShippingError::InvalidTier {
        zone: zone.to_string(),
        index,
        reason,
    };
    if !check_non_negative(tier.min_weight) {
        return Err(invalid(format!("min_weight {} is negative", tier.min_weight)));
    }
    if !tier.max_weight.is_finite() || tier.max_weight <= tier.min_weight {
        return Err(invalid(format!(
            "max_weight {} must exceed min_weight {}",
            tier.max_weight, tier.min_weight
        )));
    }
    if !check_non_negative(tier.base_price) || !check_non_negative(tier.extra_price_per_kg) {
        return Err(invalid("prices must be non-negative".to_string()));
    }
    Ok(())
}

fn validate_surcharge(name: &'static str, pct: Option<f64>) -> Result<(), ShippingError> {
    match pct {
        Some(value) if !check_non_negative(value) => {
            Err(ShippingError::InvalidSurcharge { name, value })
        }
        _ => Ok(()),
    }
}

impl ShippingRateTable {
    /// Validate a config and build the lookup table
    pub fn load(config: ShippingConfig) -> Result<Self, ShippingError> {
        validate_surcharge("fuel_surcharge_percent", config.fuel_surcharge_percent)?;
        validate_surcharge("vat_percent", config.vat_percent)?;

        let mut zones = Vec::with_capacity(config.zones.len());
        let mut provinces: HashMap<String, usize> = HashMap::new();

        for zone in config.zones {
            if zone.tiers.is_empty() {
                return Err(ShippingError::EmptyZone(zone.name));
            }
            for (index, tier) in zone.tiers.iter().enumerate() {
                validate_tier(&zone.name, index, tier)?;
            }

            let zone_index = zones.len();
            for province in &zone.province_names {
                let key = normalize_province(province);
                if let Some(&existing) = provinces.get(&key) {
                    let first: &RatedZone = &zones[existing];
                    return Err(ShippingError::DuplicateProvince {
                        province: province.clone(),
                        first: first.name.clone(),
                        second: zone.name.clone(),
                    });
                }
                provinces.insert(key, zone_index);
            }

            let mut tiers = zone.tiers;
            tiers.sort_by(|a, b| a.min_weight.total_cmp(&b.min_weight));
            zones.push(RatedZone {
                name: zone.name,
                tiers,
            });
        }

        tracing::info!(
            zones = zones.len(),
            provinces = provinces.len(),
            "Shipping rate table loaded"
        );

        Ok(Self {
            zones,
            provinces,
            fuel_surcharge_percent: config.fuel_surcharge_percent,
            vat_percent: config.vat_percent,
        })
    }

    /// Read a JSON [`ShippingConfig`] from disk and validate it
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ShippingError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: ShippingConfig = serde_json::from_str(&raw)?;
        Self::load(config)
    }

    /// Zone covering a province (trimmed, case-insensitive)
    pub fn zone_for(&self, province: &str) -> Option<&RatedZone> {
        self.provinces
            .get(&normalize_province(province))
            .map(|&index| &self.zones[index])
    }

    pub fn fuel_surcharge_percent(&self) -> Option<f64> {
        self.fuel_surcharge_percent
    }

    pub fn vat_percent(&self) -> Option<f64> {
        self.vat_percent
    }
}
