//! JSON bodies exchanged between the storefront server and its clients.
//!
//! Request bodies keep raw `Option<String>` fields so the server can report
//! missing or malformed identifiers as validation errors instead of failing
//! deserialization.

use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::role::Role;

/// Body of `POST /wishlist/add` and `POST /wishlist/remove`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    /// Owner of the wishlist; must match the authenticated user.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Product to add or remove.
    #[serde(default)]
    pub product_id: Option<String>,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    #[serde(alias = "fullName")]
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plain-text password (hashed server-side).
    pub password: String,
    /// Requested role; customers by default.
    #[serde(default)]
    pub role: Role,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Response of `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Account ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Account role.
    pub role: Role,
}

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error kind (e.g. `validation`, `storage`).
    pub error: String,
    /// Human-readable message, safe to show to the user.
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wishlist_request_tolerates_missing_fields() {
        let req: WishlistRequest = serde_json::from_str(r#"{"userId":"u1"}"#).unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u1"));
        assert_eq!(req.product_id, None);
    }

    #[test]
    fn test_register_request_accepts_form_field_names() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"fullName":"Fahad","email":"f@x.io","password":"hunter22","role":"seller"}"#,
        )
        .unwrap();
        assert_eq!(req.name, "Fahad");
        assert_eq!(req.role, Role::Seller);
    }

    #[test]
    fn test_register_request_defaults_role() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"name":"A","email":"a@b.c","password":"secret"}"#).unwrap();
        assert_eq!(req.role, Role::User);
    }
}
