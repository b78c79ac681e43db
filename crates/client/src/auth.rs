//! Client for the authentication endpoints.
//!
//! Successful registration and login initialize the [`SessionContext`];
//! logout always tears it down, even when the server cannot be reached.

use estore_core::{Email, Identity, LoginRequest, Profile, RegisterRequest, Role};

use crate::error::ClientError;
use crate::http::{ApiTransport, check, decode};
use crate::session::SessionContext;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Client for `/auth`.
#[derive(Debug, Clone)]
pub struct AuthClient {
    transport: ApiTransport,
}

impl AuthClient {
    /// Create an auth client over `transport`.
    #[must_use]
    pub const fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    fn session(&self) -> &SessionContext {
        self.transport.session()
    }

    /// Create an account and start a session for it.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` if the name or email is blank, the
    /// email is malformed, or the password is shorter than
    /// [`MIN_PASSWORD_LENGTH`]; `ClientError::Conflict` if the email is taken.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Identity, ClientError> {
        let request = validate_registration(name, email, password, role)?;
        let response = self
            .transport
            .post(&["auth", "register"])?
            .json(&request)
            .send()
            .await?;

        let identity: Identity = decode(response).await?;
        self.session().init(&identity)?;
        tracing::info!(user_id = %identity.id, "Registered");
        Ok(identity)
    }

    /// Log in with email and password and start a session.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` on bad credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, ClientError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self
            .transport
            .post(&["auth", "login"])?
            .json(&request)
            .send()
            .await?;

        let identity: Identity = decode(response).await?;
        self.session().init(&identity)?;
        tracing::info!(user_id = %identity.id, "Logged in");
        Ok(identity)
    }

    /// Revoke the session token on the server (best effort) and end the session.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Session` only if the local session cannot be cleared.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if self.session().is_authenticated()
            && let Err(e) = self.revoke().await
        {
            tracing::warn!(error = %e, "Server logout failed, clearing local session anyway");
        }

        self.session().teardown()?;
        Ok(())
    }

    async fn revoke(&self) -> Result<(), ClientError> {
        let response = self.transport.post(&["auth", "logout"])?.send().await?;
        check(response).await.map(drop)
    }

    /// The profile of the session's user, as the server sees it.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` if the token is missing, revoked or expired.
    pub async fn me(&self) -> Result<Profile, ClientError> {
        let response = self.transport.get(&["auth", "me"])?.send().await?;
        decode(response).await
    }
}

/// Check a registration form the way the server will.
///
/// # Errors
///
/// Returns `ClientError::Validation` describing the first problem found.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<RegisterRequest, ClientError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ClientError::Validation("name is required".to_string()));
    }
    let email = Email::parse(email).map_err(|e| ClientError::Validation(e.to_string()))?;
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ClientError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }

    Ok(RegisterRequest {
        name: name.to_string(),
        email: email.as_str().to_string(),
        password: password.to_string(),
        role,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use url::Url;

    use super::*;
    use crate::session::tests::identity;

    #[test]
    fn test_validate_registration() {
        let ok =
            validate_registration(" Zara ", "Zara@Example.com", "secret", Role::Seller).unwrap();
        assert_eq!(ok.name, "Zara");
        assert_eq!(ok.email, "zara@example.com");
        assert_eq!(ok.role, Role::Seller);

        for (name, email, password) in [
            ("", "a@b.co", "secret"),
            ("Zara", "", "secret"),
            ("Zara", "not-an-email", "secret"),
            ("Zara", "a@b.co", "12345"),
        ] {
            assert!(matches!(
                validate_registration(name, email, password, Role::User),
                Err(ClientError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_logout_clears_session_when_server_unreachable() {
        let session = SessionContext::in_memory();
        session.init(&identity(Role::User, Duration::hours(1))).unwrap();

        let base = Url::parse("http://127.0.0.1:9").unwrap();
        let client = AuthClient::new(ApiTransport::new(base, session.clone()).unwrap());

        client.logout().await.unwrap();
        assert!(!session.is_authenticated());
    }
}
