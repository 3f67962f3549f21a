//! Checkout API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/checkout/quote | POST | 订单金额预览 (不核销优惠券) |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/checkout", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/quote", post(handler::quote))
}
