//! Authentication service.
//!
//! Password registration and login issue opaque bearer tokens. A token is 32
//! random bytes, base64url-encoded; only its SHA-256 hash is persisted.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use estore_core::{AccessToken, Email, Identity, LoginRequest, RegisterRequest, UserId};

use crate::db::{RepositoryError, TokenRecord, TokenStore, UserStore};
use crate::models::{CurrentUser, NewUser, User};
use crate::state::AppState;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Random bytes per access token.
const TOKEN_BYTES: usize = 32;

/// Authentication service.
///
/// Handles registration, login, logout and bearer token verification.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
    tokens: &'a dyn TokenStore,
    token_ttl: Duration,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        users: &'a dyn UserStore,
        tokens: &'a dyn TokenStore,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            tokens,
            token_ttl,
        }
    }

    /// Create the service from application state.
    #[must_use]
    pub fn from_state(state: &'a AppState) -> Self {
        Self::new(state.users(), state.tokens(), state.config().token_ttl)
    }

    /// Register a new user and log them in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingName` if the name is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Identity, AuthError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        let email = Email::parse(&request.email)?;
        validate_password(&request.password)?;
        let expires_at = self.token_expiry()?;

        let password_hash = hash_password(&request.password)?;
        let new_user = NewUser {
            id: new_user_id()?,
            name: name.to_owned(),
            email,
            role: request.role,
        };

        let user = self
            .users
            .create_with_password(&new_user, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        self.issue_token(&user, expires_at).await
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, request: &LoginRequest) -> Result<Identity, AuthError> {
        let email = Email::parse(&request.email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(&request.password, &password_hash)?;
        let expires_at = self.token_expiry()?;

        let purged = self.tokens.purge_expired(Utc::now()).await?;
        if purged > 0 {
            tracing::debug!(purged, "Purged expired access tokens");
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.issue_token(&user, expires_at).await
    }

    /// Revoke the token the current request was authenticated with.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn logout(&self, user: &CurrentUser) -> Result<(), AuthError> {
        let revoked = self.tokens.revoke(&user.token_hash).await?;
        tracing::info!(user_id = %user.id, revoked, "User logged out");
        Ok(())
    }

    /// Resolve a raw bearer token to the user it authenticates.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is unknown or its user is gone.
    /// Returns `AuthError::TokenExpired` if the token is past its expiry.
    pub async fn authenticate(&self, raw_token: &str) -> Result<CurrentUser, AuthError> {
        let token_hash = hash_token(raw_token);
        let record = self
            .tokens
            .find(&token_hash)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if record.expires_at <= Utc::now() {
            return Err(AuthError::TokenExpired);
        }

        let user = self
            .users
            .get_by_id(&record.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(CurrentUser {
            id: user.id,
            name: user.name,
            role: user.role,
            token_hash,
        })
    }

    /// When a token issued now expires.
    fn token_expiry(&self) -> Result<DateTime<Utc>, AuthError> {
        Utc::now()
            .checked_add_signed(self.token_ttl)
            .ok_or(AuthError::TokenLifetime)
    }

    async fn issue_token(
        &self,
        user: &User,
        expires_at: DateTime<Utc>,
    ) -> Result<Identity, AuthError> {
        let raw = generate_token();

        self.tokens
            .insert(&TokenRecord {
                token_hash: hash_token(&raw),
                user_id: user.id.clone(),
                expires_at,
            })
            .await?;

        Ok(Identity {
            id: user.id.clone(),
            name: user.name.clone(),
            role: user.role,
            token: AccessToken::new(raw),
            expires_at,
        })
    }
}

fn new_user_id() -> Result<UserId, AuthError> {
    UserId::parse(&Uuid::new_v4().simple().to_string())
        .map_err(|e| AuthError::Repository(RepositoryError::DataCorruption(e.to_string())))
}

/// Generate a fresh random token.
fn generate_token() -> String {
    let mut bytes = [0_u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a raw token for storage and lookup.
pub(crate) fn hash_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
