//! Wishlist operations bound to the authenticated user.
//!
//! Every request names a `userId`. It must parse and it must be the caller's
//! own id; a wishlist can only be read or changed by the user who owns it.

use chrono::Utc;
use thiserror::Error;

use estore_core::{IdError, ProductId, UserId, Wishlist};

use crate::db::{RepositoryError, WishlistStore};
use crate::models::CurrentUser;

/// Errors from wishlist operations.
#[derive(Debug, Error)]
pub enum WishlistError {
    /// A `userId` or `productId` was missing or malformed.
    #[error(transparent)]
    Validation(#[from] IdError),

    /// The request names another user's wishlist.
    #[error("wishlist belongs to another user")]
    Forbidden,

    /// The store failed.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Wishlist service for one authenticated caller.
pub struct WishlistService<'a> {
    store: &'a dyn WishlistStore,
    caller: &'a CurrentUser,
}

impl<'a> WishlistService<'a> {
    /// Create a service acting on behalf of `caller`.
    #[must_use]
    pub const fn new(store: &'a dyn WishlistStore, caller: &'a CurrentUser) -> Self {
        Self { store, caller }
    }

    /// Add a product to the caller's wishlist. Adding an existing product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::Validation` for a missing or malformed id,
    /// `WishlistError::Forbidden` when `user_id` is not the caller, and
    /// `WishlistError::Storage` when the store fails.
    pub async fn add(
        &self,
        user_id: Option<&str>,
        product_id: Option<&str>,
    ) -> Result<Wishlist, WishlistError> {
        let user_id = self.bind(user_id)?;
        let product_id = ProductId::parse_optional(product_id)?;

        let wishlist = self.store.add(&user_id, &product_id, Utc::now()).await?;
        tracing::debug!(%user_id, %product_id, entries = wishlist.len(), "Wishlist add");
        Ok(wishlist)
    }

    /// The caller's wishlist in insertion order (empty if they have none).
    ///
    /// # Errors
    ///
    /// Same as [`Self::add`].
    pub async fn get(&self, user_id: &str) -> Result<Wishlist, WishlistError> {
        let user_id = self.bind(Some(user_id))?;
        Ok(self.store.get(&user_id).await?)
    }

    /// Remove a product from the caller's wishlist. Removing an absent product succeeds.
    ///
    /// # Errors
    ///
    /// Same as [`Self::add`].
    pub async fn remove(
        &self,
        user_id: Option<&str>,
        product_id: Option<&str>,
    ) -> Result<Wishlist, WishlistError> {
        let user_id = self.bind(user_id)?;
        let product_id = ProductId::parse_optional(product_id)?;

        let wishlist = self.store.remove(&user_id, &product_id).await?;
        tracing::debug!(%user_id, %product_id, entries = wishlist.len(), "Wishlist remove");
        Ok(wishlist)
    }

    fn bind(&self, raw: Option<&str>) -> Result<UserId, WishlistError> {
        let user_id = UserId::parse_optional(raw)?;
        if user_id != self.caller.id {
            tracing::warn!(
                caller = %self.caller.id,
                requested = %user_id,
                "Wishlist access for another user rejected"
            );
            return Err(WishlistError::Forbidden);
        }
        Ok(user_id)
    }
}
