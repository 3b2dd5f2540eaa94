//! Connection pool for the portfolio database.
//!
//! Every query folio issues is a short read, so the pool is sized by a
//! connection cap and an acquire timeout only.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};

use folio_core::{Error, Result};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Seconds a query waits for a free connection before failing.
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }
}

/// Open a pool against `database_url`.
///
/// A zero connection cap is raised to one.
pub async fn create_pool(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    let start = Instant::now();
    let max_connections = config.max_connections.max(1);

    info!(
        subsystem = "db",
        component = "pool",
        op = "create",
        max_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        "Creating database connection pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    PoolStatus::of(&pool).log("established", start.elapsed());
    Ok(pool)
}

/// Occupancy of a pool at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub size: u32,
    pub idle: usize,
}

impl PoolStatus {
    pub fn of(pool: &PgPool) -> Self {
        Self {
            size: pool.size(),
            idle: pool.num_idle(),
        }
    }

    /// Every open connection is checked out.
    pub fn is_saturated(&self) -> bool {
        self.size > 0 && self.idle == 0
    }

    /// INFO with the current occupancy; WARN instead when saturated.
    pub fn log(&self, op: &str, elapsed: Duration) {
        if self.is_saturated() {
            warn!(
                subsystem = "db",
                component = "pool",
                op,
                pool_size = self.size,
                "Connection pool has no idle connections"
            );
            return;
        }
        info!(
            subsystem = "db",
            component = "pool",
            op,
            pool_size = self.size,
            pool_idle = self.idle,
            duration_ms = elapsed.as_millis() as u64,
            "Database connection pool ready"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_config() {
        let config = PoolConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_saturation() {
        assert!(PoolStatus { size: 3, idle: 0 }.is_saturated());
        assert!(!PoolStatus { size: 3, idle: 1 }.is_saturated());
        // an empty pool has nothing checked out
        assert!(!PoolStatus { size: 0, idle: 0 }.is_saturated());
    }
}
