use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::AppError;

mod analyses;
mod favorites;
mod history;
mod preferences;
mod users;

/// Creates a PostgreSQL connection pool and applies pending migrations
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(max_connections, "Database pool ready, migrations applied");

    Ok(pool)
}

/// PostgreSQL implementation of every repository trait
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-constraint violation to `on_conflict`, anything else to a storage error
fn map_unique_violation(error: sqlx::Error, on_conflict: impl FnOnce() -> AppError) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            return on_conflict();
        }
    }
    AppError::Database(error)
}
