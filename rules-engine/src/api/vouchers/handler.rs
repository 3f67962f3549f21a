//! Voucher API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::AppResult;
use shared::models::{
    ExtendOutcome, RedeemOutcome, Voucher, VoucherCreate, VoucherFilter, VoucherGroupView,
    VoucherQuote,
};
use validator::Validate;

use crate::core::ServerState;
use crate::utils::validate_request;
use crate::utils::validation::{MAX_CODE_LEN, MAX_REFERENCE_LEN, not_blank};

#[derive(Debug, Deserialize, Validate)]
pub struct PriceRequest {
    #[validate(length(min = 1, max = MAX_CODE_LEN), custom(function = "not_blank"))]
    pub code: String,
    #[validate(range(min = 0))]
    pub order_value: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RedeemRequest {
    #[validate(length(min = 1, max = MAX_CODE_LEN), custom(function = "not_blank"))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ExtendRequest {
    #[validate(length(max = MAX_REFERENCE_LEN))]
    pub payment_ref: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: VoucherFilter,
}

/// POST /api/vouchers - 发放优惠券
pub async fn issue(
    State(state): State<ServerState>,
    Json(payload): Json<VoucherCreate>,
) -> AppResult<Json<Voucher>> {
    let voucher = state.vouchers.issue(payload).await?;
    Ok(Json(voucher))
}

/// POST /api/vouchers/price - 校验优惠券并计算折扣
pub async fn price(
    State(state): State<ServerState>,
    Json(payload): Json<PriceRequest>,
) -> AppResult<Json<VoucherQuote>> {
    validate_request(&payload)?;
    let quote = state
        .vouchers
        .price(&payload.code, payload.order_value)
        .await?;
    Ok(Json(quote))
}

/// POST /api/vouchers/redeem - 核销优惠券
pub async fn redeem(
    State(state): State<ServerState>,
    Json(payload): Json<RedeemRequest>,
) -> AppResult<Json<RedeemOutcome>> {
    validate_request(&payload)?;
    let outcome = state.vouchers.redeem(&payload.code).await?;
    Ok(Json(outcome))
}

/// POST /api/vouchers/:id/extend - 付费延期
pub async fn extend(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ExtendRequest>,
) -> AppResult<Json<ExtendOutcome>> {
    validate_request(&payload)?;
    let outcome = state.vouchers.extend(id, &payload.payment_ref).await?;
    Ok(Json(outcome))
}

/// GET /api/vouchers/owner/:owner_id - 按状态分组列出客户优惠券
pub async fn list_for_owner(
    State(state): State<ServerState>,
    Path(owner_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<VoucherGroupView>>> {
    let groups = state
        .vouchers
        .list_for_owner(owner_id, query.filter)
        .await?;
    Ok(Json(groups))
}
