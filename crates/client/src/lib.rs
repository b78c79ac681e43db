//! estore client.
//!
//! Everything a front end needs to talk to the storefront API:
//!
//! - [`SessionContext`] over a [`SessionStore`] ([`FileSessionStore`],
//!   [`MemorySessionStore`]) holding the current [`Identity`](estore_core::Identity)
//! - [`AuthGuard`] deciding whether a protected view renders or redirects
//! - [`AuthClient`] for register/login/logout, which starts and ends sessions
//! - [`WishlistClient`] for typed wishlist calls
//!
//! # Example
//!
//! ```rust,ignore
//! let config = ClientConfig::from_env()?;
//! let session = SessionContext::new(FileSessionStore::new(&config.session_file));
//! let transport = ApiTransport::new(config.api_url, session.clone())?;
//!
//! AuthClient::new(transport.clone()).login("me@example.com", "secret").await?;
//! let me = session.current().expect("just logged in");
//! WishlistClient::new(transport).add_to_wishlist(me.id.as_str(), "p-1").await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod session;
pub mod wishlist;

pub use auth::AuthClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use guard::{AuthGuard, GuardOutcome, post_login_target};
pub use http::ApiTransport;
pub use session::{FileSessionStore, MemorySessionStore, SessionContext, SessionError, SessionStore};
pub use wishlist::WishlistClient;
