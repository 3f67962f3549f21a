//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`vouchers`] - 优惠券定价、核销、延期、列表、发放
//! - [`shipping`] - 运费计算
//! - [`checkout`] - 结算报价
//! - [`commission_tiers`] - 佣金等级目录与匹配
//! - [`commission_transactions`] - 佣金交易审批流与统计

pub mod checkout;
pub mod commission_tiers;
pub mod commission_transactions;
pub mod health;
pub mod shipping;
pub mod vouchers;

use axum::Router;

use crate::core::ServerState;

/// All resource routers merged (without state)
pub fn router() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(vouchers::router())
        .merge(shipping::router())
        .merge(checkout::router())
        .merge(commission_tiers::router())
        .merge(commission_transactions::router())
}
