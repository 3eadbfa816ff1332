//! PostgreSQL persistence for the catalog.
//!
//! - [`models`]: row structs, DTOs and the entity <-> DTO mapping.
//! - [`resource`]: the store contract every catalog resource implements and
//!   the shared filtered/sorted/paginated queries built on it.
//! - [`repositories`]: one zero-sized repository per resource.

use sqlx::postgres::PgPoolOptions;

pub mod mapping;
pub mod models;
pub mod repositories;
pub mod resource;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
