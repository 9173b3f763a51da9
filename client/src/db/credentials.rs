use thiserror::Error;

use crate::db::DbPool;

/// Keys of the credential token set held in secure storage.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const OWNER_ID: &str = "owner_id";
    pub const ROLE: &str = "role";
    pub const GYM_ID: &str = "gym_id";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persisted key-value store for the credential token set.
///
/// The access token is replaced, never merged, on refresh; `clear` removes
/// the whole set on logout or unrecoverable refresh failure.
#[derive(Clone, Debug)]
pub struct Credentials {
    pool: DbPool,
}

impl Credentials {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>(
            r#"
            SELECT value
            FROM credentials
            WHERE key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }

    pub async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO credentials (key, value, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM credentials
            WHERE key = ?
            "#,
        )
        .bind(key)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Removes every stored credential.
    pub async fn clear(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM credentials").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn access_token(&self) -> Result<Option<String>, StoreError> {
        self.get(keys::ACCESS_TOKEN).await
    }
}
