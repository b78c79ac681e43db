//! Wishlist persistence.
//!
//! Every mutation is a single atomic statement against the
//! `(user_id, product_id)` primary key; there is no higher-level locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use estore_core::{ProductId, UserId, Wishlist, WishlistEntry};

use super::RepositoryError;

/// Storage for per-user wishlists.
#[async_trait]
pub trait WishlistStore: Send + Sync {
    /// Add `product_id` unless already present and return the resulting wishlist.
    async fn add(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        added_at: DateTime<Utc>,
    ) -> Result<Wishlist, RepositoryError>;

    /// All entries for `user_id` in insertion order (empty for unknown users).
    async fn get(&self, user_id: &UserId) -> Result<Wishlist, RepositoryError>;

    /// Remove `product_id` if present and return the resulting wishlist.
    async fn remove(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Wishlist, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct WishlistRow {
    user_id: UserId,
    product_id: ProductId,
    added_at: DateTime<Utc>,
}

impl From<WishlistRow> for WishlistEntry {
    fn from(row: WishlistRow) -> Self {
        Self {
            user_id: row.user_id,
            product_id: row.product_id,
            added_at: row.added_at,
        }
    }
}

const SELECT_WISHLIST: &str = r"
    SELECT user_id, product_id, added_at
    FROM estore.wishlist_item
    WHERE user_id = $1
    ORDER BY position ASC
";

/// `PostgreSQL` wishlist store.
pub struct PgWishlistStore {
    pool: PgPool,
}

impl PgWishlistStore {
    /// Create a new wishlist store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch<'e, E>(executor: E, user_id: &UserId) -> Result<Wishlist, RepositoryError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, WishlistRow>(SELECT_WISHLIST)
            .bind(user_id)
            .fetch_all(executor)
            .await?;

        Ok(Wishlist {
            user_id: user_id.clone(),
            entries: rows.into_iter().map(WishlistEntry::from).collect(),
        })
    }
}

#[async_trait]
impl WishlistStore for PgWishlistStore {
    async fn add(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        added_at: DateTime<Utc>,
    ) -> Result<Wishlist, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO estore.wishlist_item (user_id, product_id, added_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(added_at)
        .execute(&mut *tx)
        .await?;

        let wishlist = Self::fetch(&mut *tx, user_id).await?;
        tx.commit().await?;

        Ok(wishlist)
    }

    async fn get(&self, user_id: &UserId) -> Result<Wishlist, RepositoryError> {
        Self::fetch(&self.pool, user_id).await
    }

    async fn remove(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Wishlist, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            DELETE FROM estore.wishlist_item
            WHERE user_id = $1 AND product_id = $2
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

        let wishlist = Self::fetch(&mut *tx, user_id).await?;
        tx.commit().await?;

        Ok(wishlist)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
