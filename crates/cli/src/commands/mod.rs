//! CLI command implementations.

pub mod account;
pub mod migrate;
pub mod wishlist;

use estore_client::{ApiTransport, ClientConfig, FileSessionStore, SessionContext};

/// Build an API transport backed by the session file from the environment.
///
/// # Errors
///
/// Returns an error if the client configuration is invalid.
pub fn transport() -> Result<ApiTransport, Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    tracing::debug!(
        api_url = %config.api_url,
        session_file = %config.session_file.display(),
        "Client configured"
    );

    let session = SessionContext::new(FileSessionStore::new(config.session_file));
    Ok(ApiTransport::new(config.api_url, session)?)
}
