//! Access token persistence.
//!
//! Only SHA-256 hashes of tokens are stored; the raw token exists solely in
//! the response to the client that logged in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use estore_core::UserId;

use super::RepositoryError;

/// A stored access token.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TokenRecord {
    /// Hex-encoded SHA-256 of the raw token.
    pub token_hash: String,
    /// The user the token authenticates.
    pub user_id: UserId,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Storage for issued access tokens.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Store a newly issued token.
    async fn insert(&self, record: &TokenRecord) -> Result<(), RepositoryError>;

    /// Look up a token by hash, expired or not.
    async fn find(&self, token_hash: &str) -> Result<Option<TokenRecord>, RepositoryError>;

    /// Revoke a token. Returns `true` if it existed.
    async fn revoke(&self, token_hash: &str) -> Result<bool, RepositoryError>;

    /// Delete tokens that expired before `now`. Returns how many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
}

/// `PostgreSQL` token store.
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    /// Create a new token store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn insert(&self, record: &TokenRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO estore.access_token (token_hash, user_id, expires_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(&record.token_hash)
        .bind(&record.user_id)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<TokenRecord>, RepositoryError> {
        let record = sqlx::query_as::<_, TokenRecord>(
            r"
            SELECT token_hash, user_id, expires_at
            FROM estore.access_token
            WHERE token_hash = $1
            ",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM estore.access_token WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM estore.access_token WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
