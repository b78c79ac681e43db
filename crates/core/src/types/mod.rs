//! Core types for estore.
//!
//! This module provides type-safe wrappers for the wishlist domain.

pub mod api;
pub mod email;
pub mod id;
pub mod identity;
pub mod role;
pub mod wishlist;

pub use api::{ErrorBody, LoginRequest, Profile, RegisterRequest, WishlistRequest};
pub use email::{Email, EmailError};
pub use id::*;
pub use identity::{AccessToken, Identity};
pub use role::{Role, RoleError, RoleSet};
pub use wishlist::{Wishlist, WishlistEntry};
