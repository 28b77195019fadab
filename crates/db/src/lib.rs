//! Koda persistence layer.
//!
//! PostgreSQL access through `sqlx`: pool construction, migrations, row
//! models, and one repository per table.

use sqlx::postgres::PgPoolOptions;

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use error::DbError;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Process-wide pool, connected on first use.
///
/// Concurrent first callers share a single connection attempt. If that
/// attempt fails the handle stays empty and the next call tries again.
pub async fn shared_pool(database_url: &str) -> Result<&'static DbPool, sqlx::Error> {
    static SHARED: connection::LazyHandle<DbPool> = connection::LazyHandle::new();
    SHARED.get_or_connect(|| create_pool(database_url)).await
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
