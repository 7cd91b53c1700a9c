pub mod postgres;

pub use postgres::{connect, is_unique_violation, run_schema, DatabaseError};

use shared_config::AppConfig;
use sqlx::PgPool;

/// Shared axum state: configuration plus the Postgres connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pool: PgPool,
}
