//! 服务层 - 规则引擎对外操作
//!
//! # 服务列表
//!
//! - [`VoucherService`] - 优惠券定价、核销、延期、列表、发放
//! - [`ShippingService`] - 运费计算与结算报价
//! - [`CommissionService`] - 佣金等级目录、匹配、交易审批流与统计
//! - [`https`] - HTTP 应用组装
//!
//! Services read "now" from an injected [`Clock`]; callers of the exposed
//! operations never supply it.

pub mod commission_service;
pub mod https;
pub mod shipping_service;
pub mod voucher_service;

pub use commission_service::CommissionService;
pub use https::build_app;
pub use shipping_service::{CheckoutQuote, ShippingService};
pub use voucher_service::VoucherService;

use std::sync::Arc;

/// Source of the current time in Unix millis
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Wall clock
pub fn system_clock() -> Clock {
    Arc::new(shared::util::now_millis)
}

/// Clock frozen at `now`
pub fn fixed_clock(now: i64) -> Clock {
    Arc::new(move || now)
}
