use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use shared_config::AppConfig;

// Advisory lock key serialising schema bootstrap across processes.
const SCHEMA_LOCK_KEY: i64 = 0x6361_7265_6c69;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database not configured: {0}")]
    NotConfigured(String),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub async fn connect(config: &AppConfig) -> Result<PgPool, DatabaseError> {
    if config.database_url.is_empty() {
        return Err(DatabaseError::NotConfigured(
            "DATABASE_URL is not set".to_string(),
        ));
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    info!("Connected to Postgres");
    Ok(pool)
}

/// Apply the idempotent schema at startup. Concurrent callers are
/// serialised via an advisory lock so IF NOT EXISTS statements never race.
pub async fn run_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut conn = pool.acquire().await?;

    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *conn)
        .await?;

    let result = sqlx::raw_sql(include_str!("../schema.sql"))
        .execute(&mut *conn)
        .await;

    sqlx::query("SELECT pg_advisory_unlock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *conn)
        .await?;

    result?;

    info!("Database schema ensured");
    Ok(())
}

/// True when the error is a Postgres unique-constraint violation (23505),
/// the backstop for check-then-insert races.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}
