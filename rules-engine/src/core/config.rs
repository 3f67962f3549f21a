use shared::error::{AppError, AppResult};
use shared::models::FallbackFees;

/// 服务器配置 - 规则引擎的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (`.env` 由 dotenv 在启动时加载)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_URL | memory | `memory` 使用内存存储，否则为 SQLite URL |
/// | SHIPPING_CONFIG_PATH | (未设置) | 运费配置 JSON 文件 |
/// | TIER_CATALOG_PATH | (未设置) | 佣金等级目录 JSON 文件 |
/// | DEFAULT_WEIGHT_KG | 0.5 | 无重量商品的默认重量 |
/// | FALLBACK_FEE_NO_CONFIG | 30000 | 无配置或无目的地时的运费 |
/// | FALLBACK_FEE_NO_ZONE | 50000 | 目的地不在任何区域时的运费 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | LOG_DIR | (未设置) | 文件日志目录 |
/// | LOG_KEEP_DAYS | 14 | 应用日志保留天数 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_URL=sqlite:rules.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 存储: `memory` 或 SQLite URL
    pub database_url: String,
    /// 运费配置文件路径
    pub shipping_config_path: Option<String>,
    /// 佣金等级目录文件路径
    pub tier_catalog_path: Option<String>,
    /// 无重量商品的默认重量 (kg)
    pub default_weight_kg: f64,
    /// 兜底运费
    pub fallback_fees: FallbackFees,
    /// 日志级别
    pub log_level: String,
    /// 是否输出 JSON 日志
    pub log_json: bool,
    /// 文件日志目录
    pub log_dir: Option<String>,
    /// 应用日志保留天数
    pub log_keep_days: i64,
    /// 运行环境: development | production
    pub environment: String,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let defaults = FallbackFees::default();
        Self {
            http_port: env_parse("HTTP_PORT", 3000),
            database_url: env_opt("DATABASE_URL").unwrap_or_else(|| "memory".into()),
            shipping_config_path: env_opt("SHIPPING_CONFIG_PATH"),
            tier_catalog_path: env_opt("TIER_CATALOG_PATH"),
            default_weight_kg: env_parse("DEFAULT_WEIGHT_KG", 0.5),
            fallback_fees: FallbackFees {
                no_config: env_parse("FALLBACK_FEE_NO_CONFIG", defaults.no_config),
                no_zone: env_parse("FALLBACK_FEE_NO_ZONE", defaults.no_zone),
            },
            log_level: env_opt("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: env_parse("LOG_JSON", false),
            log_dir: env_opt("LOG_DIR"),
            log_keep_days: env_parse("LOG_KEEP_DAYS", 14),
            environment: env_opt("ENVIRONMENT").unwrap_or_else(|| "development".into()),
        }
    }

    /// 内存存储、无外部文件的配置
    ///
    /// 常用于测试场景
    pub fn in_memory() -> Self {
        Self {
            http_port: 0,
            database_url: "memory".into(),
            shipping_config_path: None,
            tier_catalog_path: None,
            default_weight_kg: 0.5,
            fallback_fees: FallbackFees::default(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            log_keep_days: 14,
            environment: "development".into(),
        }
    }

    /// 校验数值配置项
    pub fn validate(&self) -> AppResult<()> {
        if !self.default_weight_kg.is_finite() || self.default_weight_kg < 0.0 {
            return Err(AppError::config(format!(
                "DEFAULT_WEIGHT_KG must be a non-negative number, got {}",
                self.default_weight_kg
            )));
        }
        if self.fallback_fees.no_config < 0 || self.fallback_fees.no_zone < 0 {
            return Err(AppError::config("fallback shipping fees must not be negative"));
        }
        if self.log_keep_days < 1 {
            return Err(AppError::config("LOG_KEEP_DAYS must be at least 1"));
        }
        Ok(())
    }

    /// 是否使用内存存储
    pub fn uses_memory_store(&self) -> bool {
        self.database_url.eq_ignore_ascii_case("memory")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
