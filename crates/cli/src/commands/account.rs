//! Account commands: register, login, logout, whoami.
//!
//! The session is persisted to `ESTORE_SESSION_FILE` so later commands run
//! as the same user.

use estore_client::{AuthClient, ApiTransport, ClientError};
use estore_core::Role;

/// Create an account and log in as it.
///
/// # Errors
///
/// Returns `ClientError` if validation, the request, or saving the session fails.
pub async fn register(
    transport: ApiTransport,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<(), ClientError> {
    let identity = AuthClient::new(transport)
        .register(name, email, password, role)
        .await?;

    tracing::info!("Registered {} ({})", identity.name, identity.role);
    tracing::info!("  User ID: {}", identity.id);
    tracing::info!("  Session expires: {}", identity.expires_at);
    Ok(())
}

/// Log in and save the session.
///
/// # Errors
///
/// Returns `ClientError` if the credentials are rejected or the request fails.
pub async fn login(
    transport: ApiTransport,
    email: &str,
    password: &str,
) -> Result<(), ClientError> {
    let identity = AuthClient::new(transport).login(email, password).await?;

    tracing::info!("Logged in as {} ({})", identity.name, identity.role);
    tracing::info!("  User ID: {}", identity.id);
    Ok(())
}

/// Log out and forget the saved session.
///
/// # Errors
///
/// Returns `ClientError::Session` if the session file cannot be removed.
pub async fn logout(transport: ApiTransport) -> Result<(), ClientError> {
    if !transport.session().is_authenticated() {
        tracing::info!("Not logged in");
        return Ok(());
    }

    AuthClient::new(transport).logout().await?;
    tracing::info!("Logged out");
    Ok(())
}

/// Show who the saved session belongs to, as confirmed by the server.
///
/// # Errors
///
/// Returns `ClientError::Unauthorized` if there is no valid session.
pub async fn whoami(transport: ApiTransport) -> Result<(), ClientError> {
    if transport.session().current().is_none() {
        return Err(ClientError::Unauthorized(
            "not logged in (run `estore login`)".to_string(),
        ));
    }

    let profile = AuthClient::new(transport).me().await?;
    tracing::info!("{} ({})", profile.name, profile.role);
    tracing::info!("  User ID: {}", profile.id);
    Ok(())
}
