//! Typed client for the wishlist endpoints.
//!
//! Ids are validated before anything is sent, so a malformed id never costs a
//! round trip. Calls are plain request/response: no caching, no optimistic
//! updates, and a failure never touches the session.

use estore_core::{ProductId, UserId, Wishlist, WishlistRequest};

use crate::error::ClientError;
use crate::http::{ApiTransport, decode};

/// Client for `/wishlist`.
#[derive(Debug, Clone)]
pub struct WishlistClient {
    transport: ApiTransport,
}

impl WishlistClient {
    /// Create a wishlist client over `transport`.
    #[must_use]
    pub const fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    /// Add `product_id` to `user_id`'s wishlist and return the updated wishlist.
    ///
    /// Adding a product already present leaves the wishlist unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` if either id is blank or malformed
    /// (checked locally), `ClientError::Network` if the request cannot be
    /// completed, or the error matching the server's status.
    pub async fn add_to_wishlist(
        &self,
        user_id: &str,
        product_id: &str,
    ) -> Result<Wishlist, ClientError> {
        let body = request_body(user_id, product_id)?;
        let response = self
            .transport
            .post(&["wishlist", "add"])?
            .json(&body)
            .send()
            .await?;
        decode(response).await
    }

    /// Fetch `user_id`'s wishlist in insertion order (empty if none).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` for a malformed id,
    /// `ClientError::NotFound` if the server reports the user unknown, and
    /// `ClientError::Network` if the request cannot be completed.
    pub async fn get_wishlist(&self, user_id: &str) -> Result<Wishlist, ClientError> {
        let user_id = UserId::parse(user_id).map_err(|e| ClientError::Validation(e.to_string()))?;
        let response = self
            .transport
            .get(&["wishlist", user_id.as_str()])?
            .send()
            .await?;
        decode(response).await
    }

    /// Remove `product_id` from `user_id`'s wishlist and return the updated wishlist.
    ///
    /// Removing a product that is not there succeeds.
    ///
    /// # Errors
    ///
    /// Same as [`Self::add_to_wishlist`].
    pub async fn remove_from_wishlist(
        &self,
        user_id: &str,
        product_id: &str,
    ) -> Result<Wishlist, ClientError> {
        let body = request_body(user_id, product_id)?;
        let response = self
            .transport
            .post(&["wishlist", "remove"])?
            .json(&body)
            .send()
            .await?;
        decode(response).await
    }
}

fn request_body(user_id: &str, product_id: &str) -> Result<WishlistRequest, ClientError> {
    let invalid = |e: estore_core::IdError| ClientError::Validation(e.to_string());
    let user_id = UserId::parse(user_id).map_err(invalid)?;
    let product_id = ProductId::parse(product_id).map_err(invalid)?;

    Ok(WishlistRequest {
        user_id: Some(user_id.into()),
        product_id: Some(product_id.into()),
    })
}
