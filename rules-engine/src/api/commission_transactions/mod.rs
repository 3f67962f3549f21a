//! Commission Transaction API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/commission/transactions | GET | 按条件列出交易 |
//! | /api/commission/transactions | POST | 记录待审核佣金 |
//! | /api/commission/transactions/bulk | POST | 批量状态流转 |
//! | /api/commission/transactions/:id/transition | POST | 单笔状态流转 |
//! | /api/commission/stats | GET | 按状态汇总 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/commission/transactions", routes())
        .route("/api/commission/stats", get(handler::stats))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::record))
        .route("/bulk", post(handler::bulk_transition))
        .route("/{id}/transition", post(handler::transition))
}
