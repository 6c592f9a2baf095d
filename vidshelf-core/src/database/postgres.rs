use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::info;

use crate::database::infrastructure::postgres::{
    PostgresCatalogRepository, PostgresCommentRepository, PostgresUsersRepository,
};
use crate::error::{CatalogError, Result};

/// Statistics about the connection pool
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max_size: u32,
}

/// Pool sizing and the deadline applied to every store operation.
#[derive(Debug, Clone)]
pub struct PostgresOptions {
    pub max_connections: u32,
    pub min_connections: u32,
    pub store_timeout: Duration,
}

impl Default for PostgresOptions {
    fn default() -> Self {
        Self {
            max_connections: num_cpus::get() as u32,
            min_connections: 1,
            store_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    options: PostgresOptions,
    catalog: PostgresCatalogRepository,
    comments: PostgresCommentRepository,
    users: PostgresUsersRepository,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.options.max_connections)
            .field("store_timeout", &self.options.store_timeout)
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn new(connection_string: &str, options: PostgresOptions) -> Result<Self> {
        let connect_options = PgConnectOptions::from_str(connection_string).map_err(|e| {
            CatalogError::StoreUnavailable(format!("invalid database url: {e}"))
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(options.max_connections.max(1))
            .min_connections(options.min_connections)
            .acquire_timeout(options.store_timeout)
            .max_lifetime(Duration::from_secs(1800))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                CatalogError::StoreUnavailable(format!("database connection failed: {e}"))
            })?;

        info!(
            "Database pool initialized with max_connections={}, min_connections={}",
            options.max_connections, options.min_connections
        );

        Ok(Self::from_pool_with_options(pool, options))
    }

    /// Wrap an existing pool (tests hand one in through `#[sqlx::test]`).
    pub fn from_pool(pool: PgPool) -> Self {
        Self::from_pool_with_options(pool, PostgresOptions::default())
    }

    pub fn from_pool_with_options(pool: PgPool, options: PostgresOptions) -> Self {
        let timeout = options.store_timeout;
        Self {
            catalog: PostgresCatalogRepository::new(pool.clone(), timeout),
            comments: PostgresCommentRepository::new(pool.clone(), timeout),
            users: PostgresUsersRepository::new(pool.clone(), timeout),
            pool,
            options,
        }
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<()> {
        crate::MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| CatalogError::StoreUnavailable(format!("migration failed: {e}")))?;
        info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle() as u32,
            max_size: self.options.max_connections,
        }
    }

    pub fn catalog(&self) -> &PostgresCatalogRepository {
        &self.catalog
    }

    pub fn comments(&self) -> &PostgresCommentRepository {
        &self.comments
    }

    pub fn users(&self) -> &PostgresUsersRepository {
        &self.users
    }
}
