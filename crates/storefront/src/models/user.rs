//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use estore_core::{Email, Role, UserId};

/// A storefront account (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: Email,
    /// Role chosen at registration.
    pub role: Role,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// A validated registration, ready to be stored.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}
