//! Persistence for the storefront.
//!
//! # Database: `estore`
//!
//! ## Tables
//!
//! - `estore.user` - Accounts with Argon2 password hashes
//! - `estore.access_token` - SHA-256 hashes of issued bearer tokens
//! - `estore.wishlist_item` - One row per `(user_id, product_id)`, ordered by
//!   an insertion sequence
//!
//! # Stores
//!
//! Each table is reached through an async trait ([`WishlistStore`],
//! [`UserStore`], [`TokenStore`]) with a `PostgreSQL` implementation and a
//! shared in-memory implementation ([`memory::MemoryStore`]) used for tests
//! and for running without a database.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p estore-cli -- migrate
//! ```

pub mod memory;
pub mod tokens;
pub mod users;
pub mod wishlists;

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use memory::MemoryStore;
pub use tokens::{PgTokenStore, TokenRecord, TokenStore};
pub use users::{PgUserStore, UserStore};
pub use wishlists::{PgWishlistStore, WishlistStore};

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// The set of stores the application runs against.
#[derive(Clone)]
pub struct Stores {
    pub wishlists: Arc<dyn WishlistStore>,
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<dyn TokenStore>,
}

impl Stores {
    /// Stores backed by a `PostgreSQL` pool.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            wishlists: Arc::new(PgWishlistStore::new(pool.clone())),
            users: Arc::new(PgUserStore::new(pool.clone())),
            tokens: Arc::new(PgTokenStore::new(pool)),
        }
    }

    /// Stores backed by a single shared in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_memory(&Arc::new(MemoryStore::default()))
    }

    /// Stores backed by an existing in-memory store.
    #[must_use]
    pub fn from_memory(store: &Arc<MemoryStore>) -> Self {
        Self {
            wishlists: store.clone(),
            users: store.clone(),
            tokens: store.clone(),
        }
    }
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
