//! Concurrent mutation tests
//!
//! Racing writers against the same voucher or commission transaction must
//! never both succeed, on either storage backend.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use rules_engine::services::fixed_clock;
use rules_engine::{Config, ServerState};
use shared::models::{
    CommissionTransactionCreate, CommissionType, DiscountType, TransactionFilter,
    TransactionStatus, TransitionAction, TransitionPayload, VoucherCreate, VoucherSource,
};
use shared::util::DAY_MILLIS;

const NOW: i64 = 1_780_000_000_000;
const RACERS: usize = 16;

async fn memory_state() -> Arc<ServerState> {
    let state = ServerState::with_clock(&Config::in_memory(), fixed_clock(NOW))
        .await
        .unwrap();
    Arc::new(state)
}

async fn sqlite_state(dir: &tempfile::TempDir) -> Arc<ServerState> {
    let config = Config {
        database_url: format!("sqlite:{}", dir.path().join("rules.db").display()),
        ..Config::in_memory()
    };
    let state = ServerState::with_clock(&config, fixed_clock(NOW))
        .await
        .unwrap();
    Arc::new(state)
}

fn reward_voucher(code: &str) -> VoucherCreate {
    VoucherCreate {
        code: code.to_string(),
        owner_id: Some(7),
        discount_type: DiscountType::Fixed,
        discount_value: 20_000.0,
        max_discount: None,
        min_order_value: 0,
        expires_at: NOW + 10 * DAY_MILLIS,
        source: VoucherSource::OrderReward,
        max_extensions: 1,
        extension_fee: 15_000,
        extension_days: 30,
    }
}

fn accrual(user_id: i64, amount: f64) -> CommissionTransactionCreate {
    CommissionTransactionCreate {
        user_id,
        commission_type: CommissionType::DirectSale,
        commission_rate: 10.0,
        commission_amount: amount,
        order_id: None,
        period_year: 2026,
        period_month: 5,
        notes: None,
    }
}

async fn race_redeem(state: Arc<ServerState>, code: &str) -> usize {
    let attempts = (0..RACERS).map(|_| {
        let state = state.clone();
        let code = code.to_string();
        tokio::spawn(async move { state.vouchers.redeem(&code).await.unwrap() })
    });
    join_all(attempts)
        .await
        .into_iter()
        .filter(|outcome| outcome.as_ref().unwrap().ok)
        .count()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redeem_memory_single_winner() {
    let state = memory_state().await;
    state.vouchers.issue(reward_voucher("RACE-MEM")).await.unwrap();

    assert_eq!(race_redeem(state.clone(), "RACE-MEM").await, 1);

    let again = state.vouchers.redeem("RACE-MEM").await.unwrap();
    assert!(!again.ok);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redeem_sqlite_single_winner() {
    let dir = tempfile::tempdir().unwrap();
    let state = sqlite_state(&dir).await;
    state.vouchers.issue(reward_voucher("RACE-SQL")).await.unwrap();

    assert_eq!(race_redeem(state, "RACE-SQL").await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_extend_charges_once() {
    let state = memory_state().await;
    let voucher_id = state.vouchers.issue(reward_voucher("EXT-RACE")).await.unwrap().id;

    let mut handles = Vec::new();
    for i in 0..RACERS {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            state
                .vouchers
                .extend(voucher_id, &format!("PAY-{i}"))
                .await
                .unwrap()
        }));
    }
    let mut granted = Vec::new();
    for handle in handles {
        let outcome = handle.await.unwrap();
        if outcome.ok {
            granted.push(outcome.new_expires_at);
        }
    }

    assert_eq!(granted.len(), 1);
    assert_eq!(granted[0], Some(NOW + 40 * DAY_MILLIS));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_approve_cancel_race_has_one_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let state = sqlite_state(&dir).await;
    let id = state.commission.record(accrual(1, 100_000.0)).await.unwrap().id;

    let approve = {
        let state = state.clone();
        tokio::spawn(async move {
            state
                .commission
                .transition(id, TransitionAction::Approve, &TransitionPayload::default())
                .await
        })
    };
    let cancel = {
        let state = state.clone();
        tokio::spawn(async move {
            state
                .commission
                .transition(id, TransitionAction::Cancel, &TransitionPayload::default())
                .await
        })
    };
    let approve = approve.await.unwrap();
    let cancel = cancel.await.unwrap();

    // Approve then cancel is a legal sequence; cancel then approve is not.
    let stored = state
        .commission
        .list_transactions(&TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    match (approve.is_ok(), cancel.is_ok()) {
        (true, true) => assert_eq!(stored[0].status, TransactionStatus::Cancelled),
        (true, false) => assert_eq!(stored[0].status, TransactionStatus::Approved),
        (false, true) => assert_eq!(stored[0].status, TransactionStatus::Cancelled),
        (false, false) => panic!("both transitions failed"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_bulk_approvals_apply_each_id_once() {
    let state = memory_state().await;
    let mut ids = Vec::new();
    for user in 0..20 {
        let tx = state.commission.record(accrual(user, 50_000.0)).await.unwrap();
        ids.push(tx.id);
    }
    let first: Vec<i64> = ids[..14].to_vec();
    let second: Vec<i64> = ids[6..].to_vec();

    let a = {
        let state = state.clone();
        tokio::spawn(async move {
            state
                .commission
                .bulk_transition(&first, TransitionAction::Approve, &TransitionPayload::default())
                .await
                .unwrap()
        })
    };
    let b = {
        let state = state.clone();
        tokio::spawn(async move {
            state
                .commission
                .bulk_transition(&second, TransitionAction::Approve, &TransitionPayload::default())
                .await
                .unwrap()
        })
    };
    let a = a.await.unwrap();
    let b = b.await.unwrap();

    let mut approved: HashSet<i64> = HashSet::new();
    for id in a.succeeded.iter().chain(b.succeeded.iter()) {
        assert!(approved.insert(*id), "id {id} approved twice");
    }
    assert_eq!(approved.len(), ids.len());
    assert_eq!(a.succeeded.len() + a.failed.len(), 14);
    assert_eq!(b.succeeded.len() + b.failed.len(), 14);
    assert_eq!(
        a.totals.approved_amount + b.totals.approved_amount,
        50_000.0 * ids.len() as f64
    );

    let stats = state
        .commission
        .stats(&TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(stats.approved.count, 20);
    assert_eq!(stats.pending.count, 0);
}
