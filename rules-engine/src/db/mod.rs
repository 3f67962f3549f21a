//! Database Module
//!
//! SQLite connection pool, migrations, and the sqlx-backed store adapters.
//! The in-memory adapters live next to their traits in `voucher::store` and
//! `commission::store`; both families share [`StoreError`].

pub mod transactions;
pub mod vouchers;

pub use transactions::SqliteTransactionStore;
pub use vouchers::SqliteVoucherStore;

use shared::error::{AppError, ErrorCode};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use thiserror::Error;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return StoreError::Duplicate(db_err.message().to_string());
        }
        StoreError::Database(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            StoreError::Corrupt(msg) => {
                tracing::error!(error = %msg, "Corrupt record in store");
                AppError::database(msg)
            }
            StoreError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Database service, owns the SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) a SQLite database and apply migrations
    ///
    /// `url` is a sqlx SQLite URL, e.g. `sqlite:rules.db`.
    pub async fn new(url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::database(format!("Invalid database url: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");
        Self::with_pool(pool).await
    }

    /// Private in-memory database (single connection so all queries share it)
    pub async fn in_memory() -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(Self { pool })
    }
}
