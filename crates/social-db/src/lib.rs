//! # Social DB
//!
//! Persistence ports and their adapters.
//!
//! - [`ports`]: the [`UserRepository`] and [`PostRepository`] traits
//! - [`postgres`]: sqlx adapters over a [`PgPool`]
//! - [`memory`]: an in-process store used when no database is configured
//!   and by the test suites
//!
//! Follow and like updates are single atomic statements (add-if-absent,
//! remove-if-present), never read-modify-write round trips.
//!
//! # Example
//!
//! ```ignore
//! use social_db::{init_db_pool, run_migrations, postgres::PgStore};
//!
//! let pool = init_db_pool(&database_url).await?;
//! run_migrations(&pool).await?;
//! let store = PgStore::new(pool);
//! ```

pub mod memory;
pub mod ports;
pub mod postgres;

pub use memory::InMemoryStore;
pub use ports::{PostRepository, RepositoryError, UserRepository, WriteScope};
pub use sqlx::PgPool;

use sqlx::postgres::PgPoolOptions;

/// Connects a Postgres pool.
///
/// # Errors
///
/// Returns [`RepositoryError::Connection`] when the database is unreachable
/// or the URL is malformed.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, RepositoryError> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| RepositoryError::Connection(e.to_string()))
}

/// Applies the embedded migrations in `./migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| RepositoryError::Connection(e.to_string()))
}
