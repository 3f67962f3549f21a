//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/health | GET | 健康检查 |
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "uptime_seconds": 42,
//!   "storage": "memory",
//!   "shipping_config_loaded": true,
//!   "tier_count": 3
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (ok)
    status: &'static str,
    /// 版本号
    version: &'static str,
    /// 运行时间 (秒)
    uptime_seconds: u64,
    /// 存储后端
    storage: &'static str,
    /// 是否加载了运费表
    shipping_config_loaded: bool,
    /// 佣金等级数量
    tier_count: usize,
}

/// GET /api/health
async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        storage: state.storage.as_str(),
        shipping_config_loaded: state.shipping.has_table(),
        tier_count: state.commission.list_tiers().len(),
    })
}
