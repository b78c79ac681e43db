//! estore core - Shared types library.
//!
//! This crate provides the types shared by every estore component:
//! - `storefront` - The wishlist and authentication HTTP server
//! - `client` - Session store, auth guard and typed HTTP clients
//! - `cli` - Command-line front end and database migrations
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. The optional `postgres` feature adds `sqlx`
//! encoding for the identifier and role types.
//!
//! # Modules
//!
//! - [`types`] - Validated identifiers, emails, roles, wishlists, identities
//!   and the JSON bodies exchanged over HTTP

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
