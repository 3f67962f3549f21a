//! Server State
//!
//! 持有所有服务实例，作为 axum 的共享状态

use std::sync::Arc;
use std::time::Instant;

use shared::error::AppResult;

use crate::commission::{MemoryTransactionStore, TierCatalog, TransactionStore};
use crate::core::Config;
use crate::db::{DbService, SqliteTransactionStore, SqliteVoucherStore};
use crate::services::{
    Clock, CommissionService, ShippingService, VoucherService, system_clock,
};
use crate::shipping::{ShippingRateTable, ShippingRatingEngine};
use crate::voucher::{MemoryVoucherStore, VoucherStore};

/// 存储后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Sqlite,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

/// 服务器状态
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub vouchers: VoucherService,
    pub shipping: ShippingService,
    pub commission: CommissionService,
    pub storage: StorageKind,
    pub started_at: Instant,
}

impl ServerState {
    /// 初始化服务器状态 (系统时钟)
    ///
    /// 加载运费表和佣金等级目录，打开存储。任一配置文件无效都会导致启动失败。
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        Self::with_clock(config, system_clock()).await
    }

    /// 使用指定时钟初始化
    pub async fn with_clock(config: &Config, clock: Clock) -> AppResult<Self> {
        config.validate()?;

        let (voucher_store, transaction_store, storage) = open_stores(config).await?;
        let table = load_shipping_table(config)?;
        let catalog = load_tier_catalog(config)?;

        let vouchers = VoucherService::new(voucher_store, clock.clone());
        let shipping = ShippingService::new(
            table,
            ShippingRatingEngine::new(config.fallback_fees),
            config.default_weight_kg,
        );
        let commission = CommissionService::new(catalog, transaction_store, clock);

        tracing::info!(
            storage = storage.as_str(),
            shipping_table = shipping.has_table(),
            tiers = commission.list_tiers().len(),
            "Server state initialized"
        );

        Ok(Self {
            config: config.clone(),
            vouchers,
            shipping,
            commission,
            storage,
            started_at: Instant::now(),
        })
    }
}

type Stores = (Arc<dyn VoucherStore>, Arc<dyn TransactionStore>, StorageKind);

async fn open_stores(config: &Config) -> AppResult<Stores> {
    if config.uses_memory_store() {
        tracing::info!("Using in-memory stores");
        return Ok((
            Arc::new(MemoryVoucherStore::new()),
            Arc::new(MemoryTransactionStore::new()),
            StorageKind::Memory,
        ));
    }
    let db = DbService::new(&config.database_url).await?;
    Ok((
        Arc::new(SqliteVoucherStore::new(db.pool.clone())),
        Arc::new(SqliteTransactionStore::new(db.pool)),
        StorageKind::Sqlite,
    ))
}

fn load_shipping_table(config: &Config) -> AppResult<Option<ShippingRateTable>> {
    let Some(path) = config.shipping_config_path.as_deref() else {
        tracing::warn!("SHIPPING_CONFIG_PATH not set, every destination uses the no-config fee");
        return Ok(None);
    };
    let table = ShippingRateTable::from_path(path)?;
    tracing::info!(path = %path, "Shipping config loaded");
    Ok(Some(table))
}

fn load_tier_catalog(config: &Config) -> AppResult<TierCatalog> {
    let Some(path) = config.tier_catalog_path.as_deref() else {
        tracing::info!("TIER_CATALOG_PATH not set, using the built-in standard tier");
        return Ok(TierCatalog::builtin());
    };
    let catalog = TierCatalog::from_path(path)?;
    tracing::info!(
        path = %path,
        tiers = catalog.tiers().len(),
        default = %catalog.default_tier().id,
        "Tier catalog loaded"
    );
    Ok(catalog)
}
