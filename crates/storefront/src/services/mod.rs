//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration, login, logout and bearer token verification
//! - `wishlist` - Wishlist operations bound to the authenticated user

pub mod auth;
pub mod wishlist;

pub use auth::{AuthError, AuthService};
pub use wishlist::{WishlistError, WishlistService};
