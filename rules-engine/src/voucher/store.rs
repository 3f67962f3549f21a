//! Voucher record store
//!
//! [`VoucherStore`] is the collaborator the voucher service reads and writes
//! through. All mutations go through [`VoucherStore::conditional_update`] so
//! that two racing writers can never both apply.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use shared::models::Voucher;

use super::lifecycle::VoucherGuard;
use crate::db::{StoreError, StoreResult};

#[async_trait]
pub trait VoucherStore: Send + Sync {
    /// Look up by code, case-insensitively
    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Voucher>>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Voucher>>;

    /// All vouchers issued to one customer, in creation order
    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Voucher>>;

    /// Insert a new voucher; duplicate codes are rejected
    async fn insert(&self, voucher: &Voucher) -> StoreResult<()>;

    /// Replace the record with `new` only if it still matches `expected`
    ///
    /// Returns `false` when the record is missing or has changed.
    async fn conditional_update(
        &self,
        id: i64,
        expected: VoucherGuard,
        new: &Voucher,
    ) -> StoreResult<bool>;
}

/// In-memory voucher store backed by `DashMap`
///
/// Compare-and-swap runs under the per-key shard lock.
#[derive(Debug, Default)]
pub struct MemoryVoucherStore {
    vouchers: DashMap<i64, Voucher>,
    /// Lowercased code -> id
    codes: DashMap<String, i64>,
}

impl MemoryVoucherStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoucherStore for MemoryVoucherStore {
    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Voucher>> {
        let Some(id) = self.codes.get(&code.to_lowercase()).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.vouchers.get(&id).map(|v| v.clone()))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Voucher>> {
        Ok(self.vouchers.get(&id).map(|v| v.clone()))
    }

    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Voucher>> {
        let mut owned: Vec<Voucher> = self
            .vouchers
            .iter()
            .filter(|v| v.owner_id == Some(owner_id))
            .map(|v| v.clone())
            .collect();
        owned.sort_by_key(|v| (v.created_at, v.id));
        Ok(owned)
    }

    async fn insert(&self, voucher: &Voucher) -> StoreResult<()> {
        // Lock order: code slot, then id slot
        let Entry::Vacant(code_slot) = self.codes.entry(voucher.code.to_lowercase()) else {
            return Err(StoreError::Duplicate(format!(
                "voucher code {}",
                voucher.code
            )));
        };
        match self.vouchers.entry(voucher.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(format!("voucher id {}", voucher.id))),
            Entry::Vacant(id_slot) => {
                id_slot.insert(voucher.clone());
                code_slot.insert(voucher.id);
                Ok(())
            }
        }
    }

    async fn conditional_update(
        &self,
        id: i64,
        expected: VoucherGuard,
        new: &Voucher,
    ) -> StoreResult<bool> {
        let Some(mut current) = self.vouchers.get_mut(&id) else {
            return Ok(false);
        };
        if VoucherGuard::of(&current) != expected {
            return Ok(false);
        }
        *current = new.clone();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voucher::test_support::make_voucher;

    #[tokio::test]
    async fn test_find_by_code_case_insensitive() {
        let store = MemoryVoucherStore::new();
        let v = make_voucher("Summer24", 0);
        store.insert(&v).await.unwrap();

        let found = store.find_by_code("SUMMER24").await.unwrap().unwrap();
        assert_eq!(found.id, v.id);
        assert!(store.find_by_code("winter").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_code() {
        let store = MemoryVoucherStore::new();
        store.insert(&make_voucher("DUP", 0)).await.unwrap();
        let err = store.insert(&make_voucher("dup", 0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_with_same_id_keep_one() {
        let store = std::sync::Arc::new(MemoryVoucherStore::new());
        let base = make_voucher("BASE", 0);
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                let mut v = base.clone();
                v.code = format!("SAME-ID-{i}");
                tokio::spawn(async move { store.insert(&v).await.is_ok() })
            })
            .collect();
        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);

        let stored = store.find_by_id(base.id).await.unwrap().unwrap();
        let mut reachable = 0;
        for i in 0..16 {
            if let Some(found) = store.find_by_code(&format!("same-id-{i}")).await.unwrap() {
                assert_eq!(found.code, stored.code);
                reachable += 1;
            }
        }
        assert_eq!(reachable, 1);
    }

    #[tokio::test]
    async fn test_conditional_update_requires_matching_guard() {
        let store = MemoryVoucherStore::new();
        let v = make_voucher("CAS", 0);
        store.insert(&v).await.unwrap();

        let guard = VoucherGuard::of(&v);
        let mut used = v.clone();
        used.is_used = true;

        assert!(store.conditional_update(v.id, guard, &used).await.unwrap());
        assert!(!store.conditional_update(v.id, guard, &used).await.unwrap());
        assert!(!store.conditional_update(-1, guard, &used).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_by_owner() {
        let store = MemoryVoucherStore::new();
        let mut a = make_voucher("A", 0);
        a.owner_id = Some(7);
        a.created_at = 2;
        let mut b = make_voucher("B", 0);
        b.owner_id = Some(7);
        b.created_at = 1;
        let mut c = make_voucher("C", 0);
        c.owner_id = Some(8);
        for v in [&a, &b, &c] {
            store.insert(v).await.unwrap();
        }
        let owned = store.list_by_owner(7).await.unwrap();
        let codes: Vec<_> = owned.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec!["B", "A"]);
    }
}
