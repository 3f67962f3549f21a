//! Commission transaction store

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::{CommissionTransaction, TransactionFilter, TransactionStatus};

use crate::db::{StoreError, StoreResult};

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<CommissionTransaction>>;

    /// Transactions matching `filter`, newest first
    async fn list(&self, filter: &TransactionFilter) -> StoreResult<Vec<CommissionTransaction>>;

    async fn insert(&self, tx: &CommissionTransaction) -> StoreResult<()>;

    /// Replace the record with `new` only if its status is still `expected`
    ///
    /// Returns `false` when the record is missing or its status moved on.
    async fn conditional_update(
        &self,
        id: i64,
        expected: TransactionStatus,
        new: &CommissionTransaction,
    ) -> StoreResult<bool>;
}

/// In-memory transaction store backed by `DashMap`
#[derive(Debug, Default)]
pub struct MemoryTransactionStore {
    transactions: DashMap<i64, CommissionTransaction>,
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<CommissionTransaction>> {
        Ok(self.transactions.get(&id).map(|tx| tx.clone()))
    }

    async fn list(&self, filter: &TransactionFilter) -> StoreResult<Vec<CommissionTransaction>> {
        let mut matched: Vec<CommissionTransaction> = self
            .transactions
            .iter()
            .filter(|tx| filter.matches(tx))
            .map(|tx| tx.clone())
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matched)
    }

    async fn insert(&self, tx: &CommissionTransaction) -> StoreResult<()> {
        match self.transactions.entry(tx.id) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(StoreError::Duplicate(format!("commission transaction {}", tx.id)))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(tx.clone());
                Ok(())
            }
        }
    }

    async fn conditional_update(
        &self,
        id: i64,
        expected: TransactionStatus,
        new: &CommissionTransaction,
    ) -> StoreResult<bool> {
        let Some(mut current) = self.transactions.get_mut(&id) else {
            return Ok(false);
        };
        if current.status != expected {
            return Ok(false);
        }
        *current = new.clone();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commission::test_support::make_transaction;

    #[tokio::test]
    async fn test_insert_and_filter() {
        let store = MemoryTransactionStore::new();
        let mut a = make_transaction(1, TransactionStatus::Pending, 10.0);
        a.created_at = 1;
        let mut b = make_transaction(2, TransactionStatus::Paid, 20.0);
        b.created_at = 2;
        let mut c = make_transaction(3, TransactionStatus::Pending, 30.0);
        c.user_id = 9;
        c.created_at = 3;
        for tx in [&a, &b, &c] {
            store.insert(tx).await.unwrap();
        }

        let all = store.list(&TransactionFilter::default()).await.unwrap();
        assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 2, 1]);

        let filter = TransactionFilter {
            user_id: Some(1),
            status: Some(TransactionStatus::Pending),
            ..Default::default()
        };
        let hits = store.list(&filter).await.unwrap();
        assert_eq!(hits.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);

        assert!(matches!(
            store.insert(&a).await,
            Err(StoreError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn test_conditional_update_on_status() {
        let store = MemoryTransactionStore::new();
        let tx = make_transaction(1, TransactionStatus::Pending, 10.0);
        store.insert(&tx).await.unwrap();

        let mut approved = tx.clone();
        approved.status = TransactionStatus::Approved;
        assert!(
            store
                .conditional_update(1, TransactionStatus::Pending, &approved)
                .await
                .unwrap()
        );
        assert!(
            !store
                .conditional_update(1, TransactionStatus::Pending, &approved)
                .await
                .unwrap()
        );
        assert!(
            !store
                .conditional_update(99, TransactionStatus::Pending, &approved)
                .await
                .unwrap()
        );
    }
}
