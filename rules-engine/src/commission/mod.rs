//! Commission engine
//!
//! - [`catalog`]: validated tier catalog and its edit operations
//! - [`matcher`]: performance -> tier matching and progress
//! - [`workflow`]: transaction state machine and bulk bookkeeping
//! - [`stats`]: per-status aggregates
//! - [`store`]: transaction store trait and in-memory adapter

pub mod catalog;
pub mod matcher;
pub mod stats;
pub mod store;
pub mod workflow;

pub use catalog::{CatalogError, TierCatalog};
pub use matcher::{match_tier, tier_progress};
pub use stats::recompute_stats;
pub use store::{MemoryTransactionStore, TransactionStore};
pub use workflow::{BulkOutcome, TransitionError, apply_transition, check_bulk_preconditions};

#[cfg(test)]
pub(crate) mod test_support {
    use shared::models::{
        CommissionRates, CommissionTier, CommissionTransaction, CommissionType, TierRequirements,
        TransactionStatus,
    };

    use super::TierCatalog;

    pub fn make_tier(id: &str, order: i32, is_default: bool) -> CommissionTier {
        CommissionTier {
            id: id.to_string(),
            name: id.to_uppercase(),
            order,
            requirements: TierRequirements::default(),
            commission_rates: CommissionRates {
                direct_sale: 5.0 + f64::from(order),
                ..Default::default()
            },
            benefits: Default::default(),
            is_active: true,
            is_default,
        }
    }

    /// bronze (default, open) < silver < gold
    pub fn sample_catalog() -> TierCatalog {
        let bronze = make_tier("bronze", 0, true);
        let silver = CommissionTier {
            requirements: TierRequirements {
                min_monthly_sales: 10_000_000.0,
                min_monthly_orders: 10,
                ..Default::default()
            },
            ..make_tier("silver", 1, false)
        };
        let gold = CommissionTier {
            requirements: TierRequirements {
                min_monthly_sales: 50_000_000.0,
                min_monthly_orders: 30,
                min_team_size: 5,
                min_team_sales: 100_000_000.0,
                consecutive_months: 0,
            },
            ..make_tier("gold", 2, false)
        };
        match TierCatalog::load(vec![bronze, silver, gold]) {
            Ok(catalog) => catalog,
            Err(e) => panic!("sample catalog invalid: {e}"),
        }
    }

    /// Direct-sale transaction for user 1 in March 2026
    pub fn make_transaction(id: i64, status: TransactionStatus, amount: f64) -> CommissionTransaction {
        CommissionTransaction {
            id,
            user_id: 1,
            commission_type: CommissionType::DirectSale,
            commission_rate: 5.0,
            commission_amount: amount,
            order_id: None,
            status,
            period_year: 2026,
            period_month: 3,
            approved_by_name: None,
            approved_at: None,
            paid_at: None,
            payment_method: None,
            payment_reference: None,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }
}
