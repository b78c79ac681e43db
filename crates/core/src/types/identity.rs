//! Authenticated session identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::role::Role;

/// Opaque bearer token issued at login or registration.
///
/// `Debug` is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token string.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    /// The raw token, for use in an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// The identity held by a client after a successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Account ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Account role.
    pub role: Role,
    /// Bearer token for authenticated requests.
    pub token: AccessToken,
    /// When `token` stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl Identity {
    /// Whether the token has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn identity(expires_at: DateTime<Utc>) -> Identity {
        Identity {
            id: UserId::parse("u1").unwrap(),
            name: "Ayesha".to_owned(),
            role: Role::User,
            token: AccessToken::new("tok_secret_value".to_owned()),
            expires_at,
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let id = identity(now);
        assert!(id.is_expired_at(now));
        assert!(!id.is_expired_at(now - Duration::seconds(1)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", identity(Utc::now()));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("tok_secret_value"));
    }

    #[test]
    fn test_serializes_token_for_persistence() {
        let json = serde_json::to_value(identity(Utc::now())).unwrap();
        assert_eq!(json["token"], "tok_secret_value");
        assert_eq!(json["role"], "USER");
        assert!(json["expiresAt"].is_string());
    }
}
