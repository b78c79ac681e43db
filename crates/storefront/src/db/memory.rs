//! In-memory implementation of every store.
//!
//! Each operation holds one lock for its whole read-modify-write, which gives
//! the same per-request atomicity as the single-statement `PostgreSQL` updates.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use estore_core::{Email, ProductId, UserId, Wishlist};

use super::{RepositoryError, TokenRecord, TokenStore, UserStore, WishlistStore};
use crate::models::user::{NewUser, User};

/// Process-local store for wishlists, users and tokens.
#[derive(Default)]
pub struct MemoryStore {
    wishlists: RwLock<HashMap<UserId, Wishlist>>,
    users: RwLock<Users>,
    tokens: RwLock<HashMap<String, TokenRecord>>,
}

#[derive(Default)]
struct Users {
    by_id: HashMap<UserId, (User, String)>,
    id_by_email: HashMap<Email, UserId>,
}

#[async_trait]
impl WishlistStore for MemoryStore {
    async fn add(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        added_at: DateTime<Utc>,
    ) -> Result<Wishlist, RepositoryError> {
        let mut wishlists = self.wishlists.write().await;
        let wishlist = wishlists
            .entry(user_id.clone())
            .or_insert_with(|| Wishlist::empty(user_id.clone()));
        wishlist.insert(product_id.clone(), added_at);
        Ok(wishlist.clone())
    }

    async fn get(&self, user_id: &UserId) -> Result<Wishlist, RepositoryError> {
        let wishlists = self.wishlists.read().await;
        Ok(wishlists
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| Wishlist::empty(user_id.clone())))
    }

    async fn remove(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Wishlist, RepositoryError> {
        let mut wishlists = self.wishlists.write().await;
        match wishlists.get_mut(user_id) {
            Some(wishlist) => {
                wishlist.remove(product_id);
                Ok(wishlist.clone())
            }
            None => Ok(Wishlist::empty(user_id.clone())),
        }
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_with_password(
        &self,
        new_user: &NewUser,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if users.id_by_email.contains_key(&new_user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        if users.by_id.contains_key(&new_user.id) {
            return Err(RepositoryError::Conflict("user id already exists".to_owned()));
        }

        let user = User {
            id: new_user.id.clone(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            role: new_user.role,
            created_at: Utc::now(),
        };
        users
            .id_by_email
            .insert(user.email.clone(), user.id.clone());
        users
            .by_id
            .insert(user.id.clone(), (user.clone(), password_hash.to_owned()));

        Ok(user)
    }

    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users
            .id_by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.by_id.get(id).map(|(user, _)| user.clone()))
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn insert(&self, record: &TokenRecord) -> Result<(), RepositoryError> {
        self.tokens
            .write()
            .await
            .insert(record.token_hash.clone(), record.clone());
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<TokenRecord>, RepositoryError> {
        Ok(self.tokens.read().await.get(token_hash).cloned())
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        Ok(self.tokens.write().await.remove(token_hash).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, record| record.expires_at > now);
        Ok(u64::try_from(before - tokens.len()).unwrap_or(u64::MAX))
    }
}
