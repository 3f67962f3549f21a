//! Commission Transaction API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::AppResult;
use shared::models::{
    BulkTransitionResult, CommissionStats, CommissionTransaction, CommissionTransactionCreate,
    TransactionFilter, TransitionAction, TransitionPayload,
};
use validator::{Validate, ValidationError};

use crate::core::ServerState;
use crate::utils::validate_request;
use crate::utils::validation::{MAX_BULK_IDS, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_REFERENCE_LEN};

#[derive(Debug, Deserialize, Validate)]
pub struct TransitionRequest {
    pub action: TransitionAction,
    #[serde(default)]
    #[validate(custom(function = "payload_within_limits"))]
    pub payload: TransitionPayload,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkTransitionRequest {
    #[validate(length(max = MAX_BULK_IDS))]
    pub ids: Vec<i64>,
    pub action: TransitionAction,
    #[serde(default)]
    #[validate(custom(function = "payload_within_limits"))]
    pub payload: TransitionPayload,
}

fn payload_within_limits(payload: &TransitionPayload) -> Result<(), ValidationError> {
    let over = |value: &Option<String>, max: u64| {
        value.as_ref().is_some_and(|v| v.chars().count() as u64 > max)
    };
    if over(&payload.approved_by_name, MAX_NAME_LEN)
        || over(&payload.payment_method, MAX_NAME_LEN)
        || over(&payload.payment_reference, MAX_REFERENCE_LEN)
        || over(&payload.reason, MAX_NOTE_LEN)
    {
        return Err(ValidationError::new("payload_too_long"));
    }
    Ok(())
}

/// GET /api/commission/transactions - 按条件列出交易 (最新在前)
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<TransactionFilter>,
) -> AppResult<Json<Vec<CommissionTransaction>>> {
    let transactions = state.commission.list_transactions(&filter).await?;
    Ok(Json(transactions))
}

/// POST /api/commission/transactions - 记录待审核佣金
pub async fn record(
    State(state): State<ServerState>,
    Json(payload): Json<CommissionTransactionCreate>,
) -> AppResult<Json<CommissionTransaction>> {
    let tx = state.commission.record(payload).await?;
    Ok(Json(tx))
}

/// POST /api/commission/transactions/:id/transition - 单笔状态流转
pub async fn transition(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TransitionRequest>,
) -> AppResult<Json<CommissionTransaction>> {
    validate_request(&payload)?;
    let tx = state
        .commission
        .transition(id, payload.action, &payload.payload)
        .await?;
    Ok(Json(tx))
}

/// POST /api/commission/transactions/bulk - 批量状态流转
pub async fn bulk_transition(
    State(state): State<ServerState>,
    Json(payload): Json<BulkTransitionRequest>,
) -> AppResult<Json<BulkTransitionResult>> {
    validate_request(&payload)?;
    let result = state
        .commission
        .bulk_transition(&payload.ids, payload.action, &payload.payload)
        .await?;
    Ok(Json(result))
}

/// GET /api/commission/stats - 按状态汇总金额与笔数
pub async fn stats(
    State(state): State<ServerState>,
    Query(filter): Query<TransactionFilter>,
) -> AppResult<Json<CommissionStats>> {
    let stats = state.commission.stats(&filter).await?;
    Ok(Json(stats))
}
