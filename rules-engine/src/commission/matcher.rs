//! Commission tier matching

use shared::models::{
    CommissionTier, PerformanceSnapshot, RequirementGap, RequirementKind, TierProgress,
    TierRequirements,
};

use super::catalog::TierCatalog;

/// (kind, required, actual) for every populated requirement
fn populated(req: &TierRequirements, perf: &PerformanceSnapshot) -> Vec<(RequirementKind, f64, f64)> {
    [
        (
            RequirementKind::MonthlySales,
            req.min_monthly_sales,
            perf.monthly_sales,
        ),
        (
            RequirementKind::MonthlyOrders,
            f64::from(req.min_monthly_orders),
            f64::from(perf.monthly_orders),
        ),
        (
            RequirementKind::TeamSize,
            f64::from(req.min_team_size),
            f64::from(perf.team_size),
        ),
        (
            RequirementKind::TeamSales,
            req.min_team_sales,
            perf.team_sales,
        ),
        (
            RequirementKind::ConsecutiveMonths,
            f64::from(req.consecutive_months),
            f64::from(perf.consecutive_months),
        ),
    ]
    .into_iter()
    .filter(|(_, required, _)| *required > 0.0)
    .collect()
}

/// Unmet requirements of `req` for `perf` (empty when all are met)
pub fn shortfall(req: &TierRequirements, perf: &PerformanceSnapshot) -> Vec<RequirementGap> {
    populated(req, perf)
        .into_iter()
        .filter(|(_, required, actual)| actual < required)
        .map(|(requirement, required, actual)| RequirementGap {
            requirement,
            required,
            actual,
        })
        .collect()
}

/// Whether every populated requirement is satisfied; zero means no constraint
pub fn meets(req: &TierRequirements, perf: &PerformanceSnapshot) -> bool {
    populated(req, perf)
        .iter()
        .all(|(_, required, actual)| actual >= required)
}

/// Highest active tier whose requirements `perf` satisfies
///
/// Falls back to the catalog's default tier, which always exists.
pub fn match_tier<'a>(perf: &PerformanceSnapshot, catalog: &'a TierCatalog) -> &'a CommissionTier {
    catalog
        .active_descending()
        .into_iter()
        .find(|tier| meets(&tier.requirements, perf))
        .unwrap_or_else(|| catalog.default_tier())
}

/// Matched tier plus what is missing for the next one up
///
/// The next tier is the lowest-ordered active tier above the current one.
pub fn tier_progress(perf: &PerformanceSnapshot, catalog: &TierCatalog) -> TierProgress {
    let current = match_tier(perf, catalog);
    let next = catalog
        .tiers()
        .iter()
        .filter(|t| t.is_active && t.order > current.order)
        .min_by_key(|t| t.order);

    TierProgress {
        current: current.clone(),
        shortfall: next
            .map(|t| shortfall(&t.requirements, perf))
            .unwrap_or_default(),
        next: next.cloned(),
    }
}
