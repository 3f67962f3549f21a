//! SQLite voucher store

use async_trait::async_trait;
use shared::models::{DiscountType, Voucher, VoucherSource};
use sqlx::SqlitePool;

use super::{StoreError, StoreResult};
use crate::voucher::{VoucherGuard, VoucherStore};

const SELECT_COLUMNS: &str = "SELECT id, code, owner_id, discount_type, discount_value, max_discount, min_order_value, expires_at, is_used, used_at, source, extension_count, max_extensions, extension_fee, extension_days, extension_fees_paid, last_extension_ref, created_at FROM vouchers";

/// Row shape of the `vouchers` table
#[derive(Debug, sqlx::FromRow)]
struct VoucherRow {
    id: i64,
    code: String,
    owner_id: Option<i64>,
    discount_type: String,
    discount_value: f64,
    max_discount: Option<i64>,
    min_order_value: i64,
    expires_at: i64,
    is_used: bool,
    used_at: Option<i64>,
    source: String,
    extension_count: i64,
    max_extensions: i64,
    extension_fee: i64,
    extension_days: i64,
    extension_fees_paid: i64,
    last_extension_ref: Option<String>,
    created_at: i64,
}

fn to_u32(value: i64, column: &str, id: i64) -> StoreResult<u32> {
    u32::try_from(value)
        .map_err(|_| StoreError::Corrupt(format!("voucher {id}: {column} out of range ({value})")))
}

impl VoucherRow {
    fn into_voucher(self) -> StoreResult<Voucher> {
        let discount_type = DiscountType::parse(&self.discount_type).ok_or_else(|| {
            StoreError::Corrupt(format!(
                "voucher {}: unknown discount_type '{}'",
                self.id, self.discount_type
            ))
        })?;
        let source = VoucherSource::parse(&self.source).ok_or_else(|| {
            StoreError::Corrupt(format!(
                "voucher {}: unknown source '{}'",
                self.id, self.source
            ))
        })?;
        Ok(Voucher {
            extension_count: to_u32(self.extension_count, "extension_count", self.id)?,
            max_extensions: to_u32(self.max_extensions, "max_extensions", self.id)?,
            extension_days: to_u32(self.extension_days, "extension_days", self.id)?,
            id: self.id,
            code: self.code,
            owner_id: self.owner_id,
            discount_type,
            discount_value: self.discount_value,
            max_discount: self.max_discount,
            min_order_value: self.min_order_value,
            expires_at: self.expires_at,
            is_used: self.is_used,
            used_at: self.used_at,
            source,
            extension_fee: self.extension_fee,
            extension_fees_paid: self.extension_fees_paid,
            last_extension_ref: self.last_extension_ref,
            created_at: self.created_at,
        })
    }
}

/// Voucher store over a SQLite pool
///
/// Conditional updates are a single `UPDATE ... WHERE` on the guard columns;
/// the write landed iff exactly one row was affected.
#[derive(Clone)]
pub struct SqliteVoucherStore {
    pool: SqlitePool,
}

impl SqliteVoucherStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoucherStore for SqliteVoucherStore {
    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Voucher>> {
        let row = sqlx::query_as::<_, VoucherRow>(&format!(
            "{SELECT_COLUMNS} WHERE code = ? COLLATE NOCASE"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        row.map(VoucherRow::into_voucher).transpose()
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Voucher>> {
        let row = sqlx::query_as::<_, VoucherRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(VoucherRow::into_voucher).transpose()
    }

    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Voucher>> {
        let rows = sqlx::query_as::<_, VoucherRow>(&format!(
            "{SELECT_COLUMNS} WHERE owner_id = ? ORDER BY created_at, id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(VoucherRow::into_voucher).collect()
    }

    async fn insert(&self, voucher: &Voucher) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO vouchers (id, code, owner_id, discount_type, discount_value, max_discount, min_order_value, expires_at, is_used, used_at, source, extension_count, max_extensions, extension_fee, extension_days, extension_fees_paid, last_extension_ref, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(voucher.id)
        .bind(&voucher.code)
        .bind(voucher.owner_id)
        .bind(voucher.discount_type.as_str())
        .bind(voucher.discount_value)
        .bind(voucher.max_discount)
        .bind(voucher.min_order_value)
        .bind(voucher.expires_at)
        .bind(voucher.is_used)
        .bind(voucher.used_at)
        .bind(voucher.source.as_str())
        .bind(i64::from(voucher.extension_count))
        .bind(i64::from(voucher.max_extensions))
        .bind(voucher.extension_fee)
        .bind(i64::from(voucher.extension_days))
        .bind(voucher.extension_fees_paid)
        .bind(&voucher.last_extension_ref)
        .bind(voucher.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn conditional_update(
        &self,
        id: i64,
        expected: VoucherGuard,
        new: &Voucher,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE vouchers SET is_used = ?1, used_at = ?2, expires_at = ?3, extension_count = ?4, extension_fees_paid = ?5, last_extension_ref = ?6 WHERE id = ?7 AND is_used = ?8 AND extension_count = ?9 AND expires_at = ?10",
        )
        .bind(new.is_used)
        .bind(new.used_at)
        .bind(new.expires_at)
        .bind(i64::from(new.extension_count))
        .bind(new.extension_fees_paid)
        .bind(&new.last_extension_ref)
        .bind(id)
        .bind(expected.is_used)
        .bind(i64::from(expected.extension_count))
        .bind(expected.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
