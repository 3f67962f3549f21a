//! Rules Engine - 定价与佣金规则引擎
//!
//! # 架构概述
//!
//! - **优惠券** (`voucher`): 状态推导、折扣计算、核销与付费延期
//! - **运费** (`shipping`): 按省份区域与重量档计算运费
//! - **佣金** (`commission`): 等级匹配、交易审批流、统计
//! - **存储** (`db`): SQLite 持久化，测试与开发使用内存存储
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! rules-engine/src/
//! ├── core/          # 配置、状态、服务器
//! ├── services/      # 业务服务与 HTTP 组装
//! ├── api/           # HTTP 路由和处理器
//! ├── voucher/       # 优惠券规则
//! ├── shipping/      # 运费规则
//! ├── commission/    # 佣金规则
//! ├── db/            # SQLite 存储
//! ├── money.rs       # 金额运算
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod commission;
pub mod core;
pub mod db;
pub mod money;
pub mod services;
pub mod shipping;
pub mod utils;
pub mod voucher;

// Re-export 公共类型
pub use core::{Config, Server, ServerState, StorageKind};
pub use services::{CommissionService, ShippingService, VoucherService, build_app};

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// 启动环境: 加载 `.env` 之后调用，按配置初始化日志
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    init_logger_with_file(
        &config.log_level,
        config.log_json,
        config.log_dir.as_deref(),
        config.log_keep_days,
    )
}

pub fn print_banner() {
    println!(
        r#"
    ____        __
   / __ \__  __/ /__  _____
  / /_/ / / / / / _ \/ ___/
 / _, _/ /_/ / /  __(__  )
/_/ |_|\__,_/_/\___/____/
    "#
    );
}
