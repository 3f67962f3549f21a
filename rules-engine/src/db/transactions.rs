//! SQLite commission transaction store

use async_trait::async_trait;
use shared::models::{CommissionTransaction, CommissionType, TransactionFilter, TransactionStatus};
use sqlx::SqlitePool;

use super::{StoreError, StoreResult};
use crate::commission::TransactionStore;

const SELECT_COLUMNS: &str = "SELECT id, user_id, commission_type, commission_rate, commission_amount, order_id, status, period_year, period_month, approved_by_name, approved_at, paid_at, payment_method, payment_reference, notes, created_at, updated_at FROM commission_transactions";

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    user_id: i64,
    commission_type: String,
    commission_rate: f64,
    commission_amount: f64,
    order_id: Option<i64>,
    status: String,
    period_year: i64,
    period_month: i64,
    approved_by_name: Option<String>,
    approved_at: Option<i64>,
    paid_at: Option<i64>,
    payment_method: Option<String>,
    payment_reference: Option<String>,
    notes: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl TransactionRow {
    fn into_transaction(self) -> StoreResult<CommissionTransaction> {
        let id = self.id;
        let corrupt = |what: String| StoreError::Corrupt(format!("commission transaction {id}: {what}"));

        let commission_type = CommissionType::parse(&self.commission_type)
            .ok_or_else(|| corrupt(format!("unknown commission_type '{}'", self.commission_type)))?;
        let status = TransactionStatus::parse(&self.status)
            .ok_or_else(|| corrupt(format!("unknown status '{}'", self.status)))?;
        let period_year = i32::try_from(self.period_year)
            .map_err(|_| corrupt(format!("period_year out of range ({})", self.period_year)))?;
        let period_month = u32::try_from(self.period_month)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| corrupt(format!("period_month out of range ({})", self.period_month)))?;

        Ok(CommissionTransaction {
            id,
            user_id: self.user_id,
            commission_type,
            commission_rate: self.commission_rate,
            commission_amount: self.commission_amount,
            order_id: self.order_id,
            status,
            period_year,
            period_month,
            approved_by_name: self.approved_by_name,
            approved_at: self.approved_at,
            paid_at: self.paid_at,
            payment_method: self.payment_method,
            payment_reference: self.payment_reference,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Transaction store over a SQLite pool
///
/// Transitions are written with `UPDATE ... WHERE id = ? AND status = ?`, so
/// of two racing writers on the same pre-status only one affects a row.
#[derive(Clone)]
pub struct SqliteTransactionStore {
    pool: SqlitePool,
}

impl SqliteTransactionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionStore for SqliteTransactionStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<CommissionTransaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TransactionRow::into_transaction).transpose()
    }

    async fn list(&self, filter: &TransactionFilter) -> StoreResult<Vec<CommissionTransaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "{SELECT_COLUMNS} WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR period_year = ?2) AND (?3 IS NULL OR period_month = ?3) AND (?4 IS NULL OR status = ?4) ORDER BY created_at DESC, id DESC"
        ))
        .bind(filter.user_id)
        .bind(filter.period_year)
        .bind(filter.period_month.map(i64::from))
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }

    async fn insert(&self, tx: &CommissionTransaction) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO commission_transactions (id, user_id, commission_type, commission_rate, commission_amount, order_id, status, period_year, period_month, approved_by_name, approved_at, paid_at, payment_method, payment_reference, notes, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(tx.id)
        .bind(tx.user_id)
        .bind(tx.commission_type.as_str())
        .bind(tx.commission_rate)
        .bind(tx.commission_amount)
        .bind(tx.order_id)
        .bind(tx.status.as_str())
        .bind(tx.period_year)
        .bind(i64::from(tx.period_month))
        .bind(&tx.approved_by_name)
        .bind(tx.approved_at)
        .bind(tx.paid_at)
        .bind(&tx.payment_method)
        .bind(&tx.payment_reference)
        .bind(&tx.notes)
        .bind(tx.created_at)
        .bind(tx.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn conditional_update(
        &self,
        id: i64,
        expected: TransactionStatus,
        new: &CommissionTransaction,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE commission_transactions SET status = ?1, approved_by_name = ?2, approved_at = ?3, paid_at = ?4, payment_method = ?5, payment_reference = ?6, notes = ?7, updated_at = ?8 WHERE id = ?9 AND status = ?10",
        )
        .bind(new.status.as_str())
        .bind(&new.approved_by_name)
        .bind(new.approved_at)
        .bind(new.paid_at)
        .bind(&new.payment_method)
        .bind(&new.payment_reference)
        .bind(&new.notes)
        .bind(new.updated_at)
        .bind(id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commission::test_support::make_transaction;
    use crate::db::DbService;

    async fn store() -> SqliteTransactionStore {
        let db = DbService::in_memory().await.unwrap();
        SqliteTransactionStore::new(db.pool)
    }

    #[tokio::test]
    async fn test_insert_find_and_filter() {
        let store = store().await;
        let mut a = make_transaction(1, TransactionStatus::Pending, 125.5);
        a.created_at = 10;
        a.order_id = Some(77);
        let mut b = make_transaction(2, TransactionStatus::Paid, 300.0);
        b.created_at = 20;
        b.period_month = 4;
        store.insert(&a).await.unwrap();
        store.insert(&b).await.unwrap();

        assert_eq!(store.find_by_id(1).await.unwrap().unwrap(), a);
        assert!(store.find_by_id(3).await.unwrap().is_none());

        let all = store.list(&TransactionFilter::default()).await.unwrap();
        assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 1]);

        let march = TransactionFilter {
            period_year: Some(2026),
            period_month: Some(3),
            ..Default::default()
        };
        let hits = store.list(&march).await.unwrap();
        assert_eq!(hits.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);

        let paid = TransactionFilter {
            status: Some(TransactionStatus::Paid),
            ..Default::default()
        };
        assert_eq!(store.list(&paid).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_conditional_update_guards_status() {
        let store = store().await;
        let tx = make_transaction(5, TransactionStatus::Approved, 50.0);
        store.insert(&tx).await.unwrap();

        let mut paid = tx.clone();
        paid.status = TransactionStatus::Paid;
        paid.paid_at = Some(99);
        paid.payment_reference = Some("REF-1".into());
        paid.updated_at = 99;

        assert!(
            store
                .conditional_update(5, TransactionStatus::Approved, &paid)
                .await
                .unwrap()
        );
        assert!(
            !store
                .conditional_update(5, TransactionStatus::Approved, &paid)
                .await
                .unwrap()
        );
        assert_eq!(store.find_by_id(5).await.unwrap().unwrap(), paid);
    }

    #[tokio::test]
    async fn test_unknown_status_is_corrupt() {
        let store = store().await;
        store
            .insert(&make_transaction(8, TransactionStatus::Pending, 1.0))
            .await
            .unwrap();
        sqlx::query("UPDATE commission_transactions SET status = 'limbo' WHERE id = 8")
            .execute(&store.pool)
            .await
            .unwrap();
        assert!(matches!(
            store.find_by_id(8).await,
            Err(StoreError::Corrupt(_))
        ));
    }
}
