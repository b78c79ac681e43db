//! Request-scoped authentication state.

use estore_core::{Profile, Role, UserId};

/// The user a request was authenticated as.
///
/// Produced by the [`RequireAuth`](crate::middleware::RequireAuth) extractor
/// from a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// User's ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Account role.
    pub role: Role,
    /// Hash of the bearer token the request presented (used to revoke it).
    pub token_hash: String,
}

impl CurrentUser {
    /// Public view of the account.
    #[must_use]
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}
