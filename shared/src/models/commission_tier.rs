//! Commission Tier Model

use serde::{Deserialize, Serialize};

/// Performance thresholds a tier requires (zero means no constraint)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TierRequirements {
    pub min_monthly_sales: f64,
    pub min_monthly_orders: u32,
    pub min_team_size: u32,
    pub min_team_sales: f64,
    pub consecutive_months: u32,
}

/// Commission rates (percent) paid at this tier
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommissionRates {
    pub direct_sale: f64,
    pub team_sale_l1: f64,
    pub team_sale_l2: f64,
}

/// Perks granted at this tier
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TierBenefits {
    pub bonus_per_order: f64,
    pub monthly_bonus: f64,
    pub free_shipping: bool,
    pub priority_support: bool,
    pub discount_percent: f64,
}

fn default_true() -> bool {
    true
}

/// Commission tier entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommissionTier {
    /// Stable slug, e.g. "gold"
    pub id: String,
    pub name: String,
    /// Ordering key, higher is a better tier
    pub order: i32,
    #[serde(default)]
    pub requirements: TierRequirements,
    #[serde(default)]
    pub commission_rates: CommissionRates,
    #[serde(default)]
    pub benefits: TierBenefits,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_default: bool,
}

/// Create tier payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionTierCreate {
    pub id: String,
    pub name: String,
    pub order: i32,
    #[serde(default)]
    pub requirements: TierRequirements,
    #[serde(default)]
    pub commission_rates: CommissionRates,
    #[serde(default)]
    pub benefits: TierBenefits,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_default: bool,
}

impl From<CommissionTierCreate> for CommissionTier {
    fn from(data: CommissionTierCreate) -> Self {
        Self {
            id: data.id,
            name: data.name,
            order: data.order,
            requirements: data.requirements,
            commission_rates: data.commission_rates,
            benefits: data.benefits,
            is_active: data.is_active,
            is_default: data.is_default,
        }
    }
}

/// Update tier payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommissionTierUpdate {
    pub name: Option<String>,
    pub order: Option<i32>,
    pub requirements: Option<TierRequirements>,
    pub commission_rates: Option<CommissionRates>,
    pub benefits: Option<TierBenefits>,
    pub is_active: Option<bool>,
    pub is_default: Option<bool>,
}

impl CommissionTierUpdate {
    /// Apply the populated fields onto `tier`
    pub fn apply_to(self, tier: &mut CommissionTier) {
        if let Some(name) = self.name {
            tier.name = name;
        }
        if let Some(order) = self.order {
            tier.order = order;
        }
        if let Some(requirements) = self.requirements {
            tier.requirements = requirements;
        }
        if let Some(rates) = self.commission_rates {
            tier.commission_rates = rates;
        }
        if let Some(benefits) = self.benefits {
            tier.benefits = benefits;
        }
        if let Some(active) = self.is_active {
            tier.is_active = active;
        }
        if let Some(default) = self.is_default {
            tier.is_default = default;
        }
    }
}

/// Rolling performance of an agent, input to tier matching
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PerformanceSnapshot {
    pub monthly_sales: f64,
    pub monthly_orders: u32,
    pub team_size: u32,
    pub team_sales: f64,
    pub consecutive_months: u32,
}

/// Requirement dimension of a tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    MonthlySales,
    MonthlyOrders,
    TeamSize,
    TeamSales,
    ConsecutiveMonths,
}

/// One unmet requirement toward the next tier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequirementGap {
    pub requirement: RequirementKind,
    pub required: f64,
    pub actual: f64,
}

/// Matched tier plus progress toward the next one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierProgress {
    pub current: CommissionTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<CommissionTier>,
    pub shortfall: Vec<RequirementGap>,
}
