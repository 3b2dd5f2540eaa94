//! # folio-db
//!
//! PostgreSQL storage layer for folio.
//!
//! This crate provides:
//! - Connection pool management
//! - A record repository covering every entity kind
//! - The metadata overlay repository keyed by `(kind, id)`
//!
//! ## Example
//!
//! ```rust,ignore
//! use folio_db::{Database, EntityKind, RecordRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/folio").await?;
//!     let projects = db.records.find_all_by_owner(EntityKind::Project, 1).await?;
//!     println!("{} projects", projects.len());
//!     Ok(())
//! }
//! ```

pub mod metadata;
pub mod pool;
pub mod records;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use folio_core::*;

pub use metadata::PgMetadataRepository;
pub use pool::{create_pool, PoolConfig, PoolStatus};
pub use records::PgRecordRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Portfolio records of every kind.
    pub records: PgRecordRepository,
    /// Presentation metadata overlay.
    pub metadata: PgMetadataRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            records: PgRecordRepository::new(pool.clone()),
            metadata: PgMetadataRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect with the default pool settings.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(url, PoolConfig::default()).await
    }

    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Current pool occupancy.
    pub fn pool_status(&self) -> PoolStatus {
        PoolStatus::of(&self.pool)
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
