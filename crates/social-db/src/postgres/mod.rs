//! sqlx adapters for Postgres.
//!
//! Queries are checked at runtime (`query_as::<_, Row>`) so the workspace
//! builds without a live database. Rows are decoded into private row structs
//! and converted into domain models.

mod posts;
mod rows;
mod users;

use sqlx::PgPool;

use crate::ports::RepositoryError;

/// Postgres-backed implementation of both repository ports.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(db.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                RepositoryError::Connection(err.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                RepositoryError::Corrupt(err.to_string())
            }
            other => RepositoryError::Query(other.to_string()),
        }
    }
}
