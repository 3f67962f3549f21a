//! Checkout API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::error::AppResult;
use shared::models::CartLine;
use validator::Validate;

use crate::core::ServerState;
use crate::services::CheckoutQuote;
use crate::utils::validate_request;
use crate::utils::validation::{MAX_CART_LINES, MAX_CODE_LEN, MAX_NAME_LEN, cart_weights};

#[derive(Debug, Deserialize, Validate)]
pub struct QuoteRequest {
    #[validate(range(min = 0))]
    pub subtotal: i64,
    #[validate(length(max = MAX_CODE_LEN))]
    pub voucher_code: Option<String>,
    #[validate(length(max = MAX_NAME_LEN))]
    pub province: Option<String>,
    #[validate(length(max = MAX_CART_LINES), custom(function = "cart_weights"))]
    #[serde(default)]
    pub lines: Vec<CartLine>,
}

/// POST /api/checkout/quote - 结算报价
pub async fn quote(
    State(state): State<ServerState>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<CheckoutQuote>> {
    validate_request(&payload)?;
    let quote = state
        .shipping
        .quote_checkout(
            &state.vouchers,
            payload.subtotal,
            payload.voucher_code.as_deref(),
            payload.province.as_deref(),
            &payload.lines,
        )
        .await?;
    Ok(Json(quote))
}
