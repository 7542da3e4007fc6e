//! # Connection Pool
//!
//! Opens the rental store and hands out repositories over one shared pool.
//!
//! ```text
//!   DbConfig ──► Database::new ──► SqlitePool (WAL, foreign keys, busy wait)
//!                                      │
//!              ┌──────────────┬────────┴───────┬──────────────┐
//!              ▼              ▼                ▼              ▼
//!          catalog()      orders()          users()      reviews()
//! ```
//!
//! Readers never block in WAL mode, but writers take turns on a single lock.
//! Order creation opens its transaction with a write, so a second writer
//! parks in SQLite's busy handler for up to `busy_timeout` and then sees the
//! first writer's committed counter.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::catalog::CatalogRepository;
use crate::repository::order::OrderRepository;
use crate::repository::review::ReviewRepository;
use crate::repository::user::UserRepository;

const IN_MEMORY: &str = ":memory:";
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// Configuration
// =============================================================================

/// Where the store lives and how hard it may be hit.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,
    /// Default: 5. An in-memory store always uses exactly one.
    pub max_connections: u32,
    /// How long a writer waits for the write lock. Default: 5 seconds.
    pub busy_timeout: Duration,
    /// Apply pending migrations while opening. Default: true.
    pub run_migrations: bool,
}

impl DbConfig {
    /// A file-backed store at `path`, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// A private, empty store that disappears with its pool.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            ..DbConfig::new(IN_MEMORY)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the rental store. Clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the store and, unless disabled, migrates it.
    ///
    /// ## Errors
    /// - `DbError::ConnectionFailed` if the file cannot be opened
    /// - `DbError::MigrationFailed` if a migration does not apply
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout)
            .create_if_missing(true);

        // Each connection to ":memory:" is its own database
        let max_connections = if config.is_in_memory() {
            1
        } else {
            config.max_connections.max(1)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            path = %config.database_path.display(),
            max_connections,
            busy_timeout_ms = config.busy_timeout.as_millis() as u64,
            "Rental store opened"
        );

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Applies pending migrations. Safe to call repeatedly.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool, for queries no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn catalog(&self) -> CatalogRepository {
        CatalogRepository::new(self.pool.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn reviews(&self) -> ReviewRepository {
        ReviewRepository::new(self.pool.clone())
    }

    /// Waits for in-flight queries, then closes every connection.
    pub async fn close(&self) {
        info!("Closing rental store");
        self.pool.close().await;
    }

    /// `true` while the store answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
