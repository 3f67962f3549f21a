//! Commission Tier API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::AppResult;
use shared::models::{
    CommissionTier, CommissionTierCreate, CommissionTierUpdate, PerformanceSnapshot, TierProgress,
};

use crate::core::ServerState;

/// GET /api/commission/tiers - 获取所有等级 (按 order 升序)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<CommissionTier>>> {
    Ok(Json(state.commission.list_tiers()))
}

/// GET /api/commission/tiers/:id - 获取单个等级
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CommissionTier>> {
    let tier = state.commission.get_tier(&id)?;
    Ok(Json(tier))
}

/// POST /api/commission/tiers - 创建等级
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CommissionTierCreate>,
) -> AppResult<Json<CommissionTier>> {
    let tier = state.commission.create_tier(payload)?;
    Ok(Json(tier))
}

/// PUT /api/commission/tiers/:id - 更新等级
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CommissionTierUpdate>,
) -> AppResult<Json<CommissionTier>> {
    let tier = state.commission.update_tier(&id, payload)?;
    Ok(Json(tier))
}

/// DELETE /api/commission/tiers/:id - 删除等级
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.commission.delete_tier(&id)?;
    Ok(Json(true))
}

/// POST /api/commission/tiers/match - 按业绩匹配等级并给出晋级差距
pub async fn match_tier(
    State(state): State<ServerState>,
    Json(perf): Json<PerformanceSnapshot>,
) -> AppResult<Json<TierProgress>> {
    Ok(Json(state.commission.tier_progress(&perf)))
}
