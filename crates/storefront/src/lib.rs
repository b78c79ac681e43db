//! estore storefront library.
//!
//! The wishlist and authentication API as a library, so the binary, the CLI
//! and the integration tests all build the same [`routes::app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::StorefrontConfig;
pub use routes::app;
pub use state::AppState;

/// Migrations for the storefront database.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
