//! End-to-end test harness for estore.
//!
//! [`TestServer`] runs the real storefront router on an ephemeral loopback
//! port with in-memory stores, so tests exercise the full HTTP stack without
//! a database.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p estore-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use url::Url;

use estore_client::{ApiTransport, AuthClient, ClientError, SessionContext, WishlistClient};
use estore_storefront::db::{MemoryStore, Stores, WishlistStore};
use estore_storefront::{AppState, StorefrontConfig, app};

/// A storefront served on `127.0.0.1:<ephemeral>` for the life of the value.
pub struct TestServer {
    base_url: Url,
    memory: Arc<MemoryStore>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with fresh in-memory stores.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with(StorefrontConfig::local(), |stores| stores).await
    }

    /// Start a server, letting the caller replace individual stores.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the listener cannot be bound.
    pub async fn start_with(
        config: StorefrontConfig,
        customize: impl FnOnce(Stores) -> Stores,
    ) -> std::io::Result<Self> {
        let memory = Arc::new(MemoryStore::default());
        let stores = customize(Stores::from_memory(&memory));

        let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
        let addr = listener.local_addr()?;
        let router = app(AppState::new(config, stores));

        // Panics here land in the output of the test that owns the server.
        let handle = tokio::spawn(async move {
            if let Err(e) = axum_serve(listener, router).await {
                panic!("test server on {addr} failed: {e}");
            }
        });

        let base_url = Url::parse(&format!("http://{addr}"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        Ok(Self {
            base_url,
            memory,
            handle,
        })
    }

    /// Base URL of the running server.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The server's wishlist store, for asserting on state directly.
    #[must_use]
    pub fn wishlists(&self) -> &dyn WishlistStore {
        self.memory.as_ref()
    }

    /// Clients sharing `session`, pointed at this server.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Network` if the HTTP client fails to build.
    pub fn clients(&self, session: SessionContext) -> Result<Clients, ClientError> {
        let transport = ApiTransport::new(self.base_url.clone(), session.clone())?;
        Ok(Clients {
            session,
            auth: AuthClient::new(transport.clone()),
            wishlist: WishlistClient::new(transport),
        })
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// The client half of a test: a session and the API clients bound to it.
pub struct Clients {
    pub session: SessionContext,
    pub auth: AuthClient,
    pub wishlist: WishlistClient,
}

async fn axum_serve(
    listener: tokio::net::TcpListener,
    router: axum::Router,
) -> std::io::Result<()> {
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
