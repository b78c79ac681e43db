//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::{Stores, TokenStore, UserStore, WishlistStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the stores and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    stores: Stores,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `stores` - Wishlist, user and token stores (`PostgreSQL` or in-memory)
    #[must_use]
    pub fn new(config: StorefrontConfig, stores: Stores) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, stores }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the wishlist store.
    #[must_use]
    pub fn wishlists(&self) -> &dyn WishlistStore {
        self.inner.stores.wishlists.as_ref()
    }

    /// Get the user store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.stores.users.as_ref()
    }

    /// Get the access token store.
    #[must_use]
    pub fn tokens(&self) -> &dyn TokenStore {
        self.inner.stores.tokens.as_ref()
    }
}
