use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

use crate::cfg;

pub type DbPool = sqlx::SqlitePool;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    ConnectionFailed(sqlx::Error),

    #[error("Database operation failed: {0}")]
    OperationFailed(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),
}

/// Opens the local credential database and applies the embedded migrations.
pub async fn init_pool(db_config: &cfg::DatabaseSettings) -> Result<DbPool, DbError> {
    let options = SqliteConnectOptions::from_str(&db_config.url)
        .map_err(DbError::ConnectionFailed)?
        .create_if_missing(true)
        .foreign_keys(true)
        // Increase SQLite busy timeout to handle concurrent connections better
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(db_config.max_connections)
        .connect_with(options)
        .await
        .map_err(DbError::ConnectionFailed)?;

    sqlx::migrate!().run(&pool).await?;

    tracing::debug!("Credential database initialized");
    Ok(pool)
}
