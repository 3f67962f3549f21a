//! Shipping API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::error::AppResult;
use shared::models::{CartLine, ShippingConfig, ShippingQuote};
use validator::Validate;

use crate::core::ServerState;
use crate::utils::validate_request;
use crate::utils::validation::{MAX_CART_LINES, MAX_NAME_LEN, cart_weights};

#[derive(Debug, Deserialize, Validate)]
pub struct FeeRequest {
    #[validate(length(max = MAX_NAME_LEN))]
    pub province: Option<String>,
    #[validate(length(max = MAX_CART_LINES), custom(function = "cart_weights"))]
    pub lines: Vec<CartLine>,
    /// Rate against this table instead of the startup one
    pub config: Option<ShippingConfig>,
}

/// POST /api/shipping/fee - 计算运费
pub async fn compute_fee(
    State(state): State<ServerState>,
    Json(payload): Json<FeeRequest>,
) -> AppResult<Json<ShippingQuote>> {
    validate_request(&payload)?;
    let quote = state.shipping.compute_fee(
        payload.province.as_deref(),
        &payload.lines,
        payload.config,
    )?;
    Ok(Json(quote))
}
