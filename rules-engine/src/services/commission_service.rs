//! Commission Service
//!
//! Owns the live tier catalog and drives the transaction workflow against a
//! [`TransactionStore`].
//!
//! The catalog sits behind a `parking_lot::RwLock`. Edits build and validate
//! a candidate under the write lock and swap it in only on success, so
//! readers always see a catalog with exactly one active default tier.

use std::sync::Arc;

use parking_lot::RwLock;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    BulkTransitionResult, CommissionStats, CommissionTier, CommissionTierCreate,
    CommissionTierUpdate, CommissionTransaction, CommissionTransactionCreate, PerformanceSnapshot,
    TierProgress, TransactionFilter, TransitionAction, TransitionPayload,
};
use shared::util::snowflake_id;

use super::Clock;
use crate::commission::{
    BulkOutcome, TierCatalog, TransactionStore, TransitionError, apply_transition,
    check_bulk_preconditions, match_tier, recompute_stats, tier_progress,
};

#[derive(Clone)]
pub struct CommissionService {
    catalog: Arc<RwLock<TierCatalog>>,
    store: Arc<dyn TransactionStore>,
    clock: Clock,
}

impl std::fmt::Debug for CommissionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommissionService")
            .field("tiers", &self.catalog.read().tiers().len())
            .finish_non_exhaustive()
    }
}

impl CommissionService {
    pub fn new(catalog: TierCatalog, store: Arc<dyn TransactionStore>, clock: Clock) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            store,
            clock,
        }
    }

    fn now(&self) -> i64 {
        (self.clock)()
    }

    // ==================== Tier catalog ====================

    /// All tiers, ascending by `order`
    pub fn list_tiers(&self) -> Vec<CommissionTier> {
        let mut tiers = self.catalog.read().tiers().to_vec();
        tiers.sort_by_key(|t| t.order);
        tiers
    }

    pub fn get_tier(&self, id: &str) -> AppResult<CommissionTier> {
        self.catalog
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::with_message(ErrorCode::TierNotFound, format!("Tier '{id}' not found")))
    }

    pub fn create_tier(&self, data: CommissionTierCreate) -> AppResult<CommissionTier> {
        let tier: CommissionTier = data.into();
        let id = tier.id.clone();
        let mut catalog = self.catalog.write();
        let candidate = catalog.with_created(tier)?;
        *catalog = candidate;
        tracing::info!(target: "audit", action = "tier.create", tier_id = %id, "AUDIT");
        catalog
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::internal(format!("Tier '{id}' missing after create")))
    }

    pub fn update_tier(&self, id: &str, data: CommissionTierUpdate) -> AppResult<CommissionTier> {
        let mut catalog = self.catalog.write();
        let candidate = catalog.with_updated(id, data)?;
        *catalog = candidate;
        tracing::info!(target: "audit", action = "tier.update", tier_id = %id, "AUDIT");
        catalog
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::internal(format!("Tier '{id}' missing after update")))
    }

    pub fn delete_tier(&self, id: &str) -> AppResult<()> {
        let mut catalog = self.catalog.write();
        let candidate = catalog.with_deleted(id)?;
        *catalog = candidate;
        tracing::info!(target: "audit", action = "tier.delete", tier_id = %id, "AUDIT");
        Ok(())
    }

    // ==================== Tier matching ====================

    pub fn match_tier(&self, perf: &PerformanceSnapshot) -> CommissionTier {
        match_tier(perf, &self.catalog.read()).clone()
    }

    pub fn tier_progress(&self, perf: &PerformanceSnapshot) -> TierProgress {
        tier_progress(perf, &self.catalog.read())
    }

    // ==================== Transactions ====================

    /// Record a new pending accrual
    pub async fn record(&self, data: CommissionTransactionCreate) -> AppResult<CommissionTransaction> {
        if !data.commission_amount.is_finite() || data.commission_amount < 0.0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "commission_amount must be a non-negative number",
            ));
        }
        if !(1..=12).contains(&data.period_month) {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("period_month {} is not a month", data.period_month),
            ));
        }
        let tx = data.into_transaction(snowflake_id(), self.now());
        self.store.insert(&tx).await?;
        tracing::info!(
            target: "audit",
            action = "commission.record",
            transaction_id = tx.id,
            user_id = tx.user_id,
            amount = tx.commission_amount,
            "AUDIT"
        );
        Ok(tx)
    }

    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> AppResult<Vec<CommissionTransaction>> {
        Ok(self.store.list(filter).await?)
    }

    /// Load, plan and conditionally persist one transition
    async fn run_transition(
        &self,
        id: i64,
        action: TransitionAction,
        payload: &TransitionPayload,
    ) -> Result<CommissionTransaction, TransitionError> {
        let current = self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| TransitionError::Store(e.to_string()))?
            .ok_or(TransitionError::NotFound(id))?;
        let next = apply_transition(&current, action, payload, self.now())?;

        let landed = self
            .store
            .conditional_update(id, current.status, &next)
            .await
            .map_err(|e| TransitionError::Store(e.to_string()))?;
        if !landed {
            tracing::info!(transaction_id = id, action = action.as_str(), "Transition lost a concurrent race");
            return Err(TransitionError::InvalidTransition {
                id,
                from: current.status,
                action,
            });
        }

        tracing::info!(
            target: "audit",
            action = action.as_str(),
            transaction_id = id,
            from = current.status.as_str(),
            to = next.status.as_str(),
            amount = next.commission_amount,
            approved_by = ?next.approved_by_name,
            payment_reference = ?next.payment_reference,
            "AUDIT"
        );
        Ok(next)
    }

    pub async fn transition(
        &self,
        id: i64,
        action: TransitionAction,
        payload: &TransitionPayload,
    ) -> AppResult<CommissionTransaction> {
        self.run_transition(id, action, payload).await.map_err(|e| match e {
            TransitionError::Store(msg) => AppError::database(msg),
            other => other.into(),
        })
    }

    /// Apply one action to many transactions, best effort per id
    ///
    /// Batch preconditions fail the whole request before any record is
    /// touched; afterwards every id gets its own success or failure entry.
    pub async fn bulk_transition(
        &self,
        ids: &[i64],
        action: TransitionAction,
        payload: &TransitionPayload,
    ) -> AppResult<BulkTransitionResult> {
        check_bulk_preconditions(ids, action, payload)?;

        let mut outcome = BulkOutcome::new();
        for &id in ids {
            if !outcome.claim(id) {
                continue;
            }
            match self.run_transition(id, action, payload).await {
                Ok(tx) => outcome.succeed(&tx),
                Err(e) => outcome.fail(id, e),
            }
        }

        let result = outcome.finish();
        tracing::info!(
            action = action.as_str(),
            requested = ids.len(),
            succeeded = result.succeeded.len(),
            failed = result.failed.len(),
            "Bulk transition finished"
        );
        Ok(result)
    }

    /// Per-status totals, recomputed from the store on every call
    pub async fn stats(&self, filter: &TransactionFilter) -> AppResult<CommissionStats> {
        let filter = TransactionFilter {
            status: None,
            ..filter.clone()
        };
        let transactions = self.store.list(&filter).await?;
        Ok(recompute_stats(&transactions))
    }
}
