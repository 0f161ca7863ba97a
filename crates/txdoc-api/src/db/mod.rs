//! # Database Persistence Layer
//!
//! Postgres persistence for compliance records via SQLx.
//!
//! The database is optional. When `DATABASE_URL` is set, records are
//! persisted through [`records::PgRecordStore`]. When absent, the API keeps
//! records in memory, which is suitable for development and testing only.
//!
//! Organizations are never persisted here. They live in the organization
//! directory, and the schema declares no foreign key toward them.

pub mod records;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the connection pool and run embedded migrations.
///
/// Returns `None` if `DATABASE_URL` is not set.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set, running in-memory only mode. \
                 Records will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Round-trip a trivial query. Used by the readiness probe.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
